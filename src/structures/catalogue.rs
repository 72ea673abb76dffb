use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::structures::{Bus, BusID, LatLng, Stop, StopID};

/// Stops, buses and measured road distances.
///
/// Stops and buses live in append-only arenas and are addressed by index, so an
/// id handed out once stays valid for the lifetime of the catalogue.
#[derive(Debug, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stops_by_name: BTreeMap<String, StopID>,
    buses_by_name: BTreeMap<String, BusID>,
    buses_for_stop: Vec<Vec<BusID>>,
    distances: HashMap<(StopID, StopID), u32>,
}

impl Catalogue {
    pub fn new() -> Catalogue {
        Catalogue::default()
    }

    /// Registers a stop. A name seen before keeps its first definition.
    pub fn add_stop(&mut self, name: &str, lat_lng: LatLng) -> StopID {
        if let Some(&id) = self.stops_by_name.get(name) {
            debug!("Stop '{name}' already registered, ignoring redefinition");
            return id;
        }

        let id = StopID(self.stops.len());
        self.stops.push(Stop {
            name: name.to_string(),
            lat_lng,
        });
        self.buses_for_stop.push(Vec::new());
        self.stops_by_name.insert(name.to_string(), id);
        id
    }

    /// Registers a bus over already registered stops. A name seen before keeps
    /// its first definition.
    pub fn add_bus(&mut self, name: &str, stops: &[StopID], is_roundtrip: bool) -> BusID {
        self.insert_bus(Bus::new(name, stops, is_roundtrip))
    }

    /// Registers a bus whose route is already expanded.
    pub(crate) fn insert_bus(&mut self, bus: Bus) -> BusID {
        if let Some(&id) = self.buses_by_name.get(&bus.name) {
            debug!("Bus '{}' already registered, ignoring redefinition", bus.name);
            return id;
        }

        for stop in bus.route.iter().chain(bus.start_stop.iter()).chain(bus.end_stop.iter()) {
            assert!(
                stop.0 < self.stops.len(),
                "bus '{}' references unknown stop {stop}",
                bus.name
            );
        }

        let id = BusID(self.buses.len());
        for &stop in &bus.route {
            let served = &mut self.buses_for_stop[stop.0];
            if served.contains(&id) {
                continue;
            }
            let buses = &self.buses;
            let pos = served.partition_point(|other| buses[other.0].name < bus.name);
            served.insert(pos, id);
        }
        self.buses_by_name.insert(bus.name.clone(), id);
        self.buses.push(bus);
        id
    }

    /// Sets the road distance for the ordered pair. Last write wins.
    pub fn set_distance(&mut self, from: StopID, to: StopID, meters: u32) {
        self.distances.insert((from, to), meters);
    }

    /// Road distance from `from` to `to`, falling back to the reverse
    /// direction, and 0 when neither was measured.
    pub fn distance(&self, from: StopID, to: StopID) -> u32 {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .copied()
            .unwrap_or(0)
    }

    pub fn stop_id(&self, name: &str) -> Option<StopID> {
        self.stops_by_name.get(name).copied()
    }

    pub fn stop(&self, id: StopID) -> Option<&Stop> {
        self.stops.get(id.0)
    }

    pub fn bus_id(&self, name: &str) -> Option<BusID> {
        self.buses_by_name.get(name).copied()
    }

    pub fn bus(&self, id: BusID) -> Option<&Bus> {
        self.buses.get(id.0)
    }

    /// Buses serving the stop, ordered by bus name.
    pub fn buses_for_stop(&self, id: StopID) -> &[BusID] {
        self.buses_for_stop
            .get(id.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_stop_served(&self, id: StopID) -> bool {
        !self.buses_for_stop(id).is_empty()
    }

    /// All stops in name order.
    pub fn stops(&self) -> impl Iterator<Item = (StopID, &Stop)> {
        self.stops_by_name
            .values()
            .map(|&id| (id, &self.stops[id.0]))
    }

    /// All buses in name order.
    pub fn buses(&self) -> impl Iterator<Item = (BusID, &Bus)> {
        self.buses_by_name
            .values()
            .map(|&id| (id, &self.buses[id.0]))
    }

    /// Explicitly measured distances, in no particular order.
    pub fn distances(&self) -> impl Iterator<Item = (StopID, StopID, u32)> + '_ {
        self.distances
            .iter()
            .map(|(&(from, to), &meters)| (from, to, meters))
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    /// Road length of the whole physical route.
    pub fn route_length(&self, bus: &Bus) -> u64 {
        bus.route
            .windows(2)
            .map(|pair| u64::from(self.distance(pair[0], pair[1])))
            .sum()
    }

    /// Great-circle length of the whole physical route.
    pub fn route_geo_length(&self, bus: &Bus) -> f64 {
        bus.route
            .windows(2)
            .map(|pair| self.stops[pair[0].0].loc().dist(self.stops[pair[1].0].loc()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Catalogue, StopID, StopID, StopID) {
        let mut c = Catalogue::new();
        let a = c.add_stop("A", LatLng::new(0.0, 0.0));
        let b = c.add_stop("B", LatLng::new(0.0, 0.01));
        let z = c.add_stop("Z", LatLng::new(0.0, 0.02));
        (c, a, b, z)
    }

    #[test]
    fn first_stop_definition_wins() {
        let (mut c, a, _, _) = sample();
        let again = c.add_stop("A", LatLng::new(10.0, 10.0));
        assert_eq!(again, a);
        assert_eq!(c.stop_count(), 3);
        assert_eq!(c.stop(a).unwrap().lat_lng, LatLng::new(0.0, 0.0));
    }

    #[test]
    fn first_bus_definition_wins() {
        let (mut c, a, b, z) = sample();
        let first = c.add_bus("1", &[a, b], false);
        let second = c.add_bus("1", &[b, z, b], true);
        assert_eq!(first, second);
        assert_eq!(c.bus_count(), 1);
        let bus = c.bus(first).unwrap();
        assert!(!bus.is_roundtrip);
        assert_eq!(bus.route, vec![a, b, a]);
        assert!(!c.is_stop_served(z));
    }

    #[test]
    fn distance_falls_back_to_reverse() {
        let (mut c, a, b, _) = sample();
        c.set_distance(a, b, 1000);
        assert_eq!(c.distance(a, b), 1000);
        assert_eq!(c.distance(b, a), 1000);

        c.set_distance(b, a, 1200);
        assert_eq!(c.distance(a, b), 1000);
        assert_eq!(c.distance(b, a), 1200);
    }

    #[test]
    fn distance_last_write_wins() {
        let (mut c, a, b, _) = sample();
        c.set_distance(a, b, 1000);
        c.set_distance(a, b, 700);
        assert_eq!(c.distance(a, b), 700);
    }

    #[test]
    fn unknown_distance_is_zero() {
        let (c, a, _, z) = sample();
        assert_eq!(c.distance(a, z), 0);
        assert_eq!(c.distance(a, a), 0);
    }

    #[test]
    fn buses_for_stop_sorted_by_name() {
        let (mut c, a, b, _) = sample();
        let b750 = c.add_bus("750", &[a, b], false);
        let b256 = c.add_bus("256", &[b, a, b], true);
        let b100 = c.add_bus("100", &[b], false);
        assert_eq!(c.buses_for_stop(b), &[b100, b256, b750]);
        assert_eq!(c.buses_for_stop(a), &[b256, b750]);
    }

    #[test]
    fn enumeration_in_name_order() {
        let mut c = Catalogue::new();
        c.add_stop("Zoo", LatLng::new(0.0, 0.0));
        c.add_stop("Airport", LatLng::new(0.0, 0.0));
        c.add_stop("Market", LatLng::new(0.0, 0.0));
        let names: Vec<&str> = c.stops().map(|(_, s)| s.name.as_str()).collect();
        assert_eq!(names, vec!["Airport", "Market", "Zoo"]);
    }

    #[test]
    fn unserved_stop() {
        let (mut c, a, b, z) = sample();
        c.add_bus("1", &[a, b], false);
        assert!(c.is_stop_served(a));
        assert!(!c.is_stop_served(z));
        assert!(c.buses_for_stop(z).is_empty());
    }

    #[test]
    fn route_lengths() {
        let (mut c, a, b, z) = sample();
        c.set_distance(a, b, 1000);
        c.set_distance(b, z, 1500);
        c.set_distance(z, b, 1400);
        let id = c.add_bus("1", &[a, b, z], false);
        let bus = c.bus(id).unwrap();
        // a-b, b-z, z-b, b-a
        assert_eq!(c.route_length(bus), 1000 + 1500 + 1400 + 1000);
        let geo = c.route_geo_length(bus);
        let leg = LatLng::new(0.0, 0.0).dist(LatLng::new(0.0, 0.01));
        assert!((geo - 4.0 * leg).abs() < 1.0);
    }

    #[test]
    #[should_panic]
    fn foreign_stop_is_rejected() {
        let (mut c, a, _, _) = sample();
        c.add_bus("1", &[a, StopID(42)], true);
    }
}
