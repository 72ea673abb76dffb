use std::{
    collections::{BTreeMap, HashSet},
    fs,
};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    ingestion::IngestionError,
    structures::{Catalogue, Color, LatLng, RenderSettings, RoutingSettings, StopID},
};

/// Network as described by the build input.
#[derive(Debug, Deserialize)]
pub struct NetworkDescription {
    #[serde(default)]
    pub stops: Vec<StopDescription>,
    #[serde(default)]
    pub buses: Vec<BusDescription>,
    pub routing_settings: RoutingSettings,
    #[serde(default)]
    pub render_settings: Option<RenderDescription>,
}

#[derive(Debug, Deserialize)]
pub struct StopDescription {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Neighbor name to road meters.
    #[serde(default)]
    pub road_distances: BTreeMap<String, u32>,
}

#[derive(Debug, Deserialize)]
pub struct BusDescription {
    pub name: String,
    pub stops: Vec<String>,
    pub is_roundtrip: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ColorDescription {
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
}

#[derive(Debug, Deserialize)]
pub struct RenderDescription {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,
    pub bus_label_font_size: u32,
    pub bus_label_offset: [f64; 2],
    pub stop_label_font_size: u32,
    pub stop_label_offset: [f64; 2],
    pub underlayer_color: ColorDescription,
    pub underlayer_width: f64,
    #[serde(default)]
    pub color_palette: Vec<ColorDescription>,
}

impl From<&ColorDescription> for Color {
    fn from(color: &ColorDescription) -> Self {
        match color {
            ColorDescription::Named(name) => Color::Named(name.clone()),
            ColorDescription::Rgb(r, g, b) => Color::Rgb(*r, *g, *b),
            ColorDescription::Rgba(r, g, b, a) => Color::Rgba(*r, *g, *b, *a),
        }
    }
}

impl From<&RenderDescription> for RenderSettings {
    fn from(d: &RenderDescription) -> Self {
        RenderSettings {
            width: d.width,
            height: d.height,
            padding: d.padding,
            line_width: d.line_width,
            stop_radius: d.stop_radius,
            bus_label_font_size: d.bus_label_font_size,
            bus_label_offset: (d.bus_label_offset[0], d.bus_label_offset[1]),
            stop_label_font_size: d.stop_label_font_size,
            stop_label_offset: (d.stop_label_offset[0], d.stop_label_offset[1]),
            underlayer_color: Color::from(&d.underlayer_color),
            underlayer_width: d.underlayer_width,
            color_palette: d.color_palette.iter().map(Color::from).collect(),
        }
    }
}

impl NetworkDescription {
    pub fn load(path: &str) -> Result<Self, IngestionError> {
        let content = fs::read_to_string(path)?;
        NetworkDescription::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, IngestionError> {
        Ok(serde_yml::from_str(content)?)
    }

    pub fn routing_settings(&self) -> Result<RoutingSettings, IngestionError> {
        let settings = self.routing_settings;
        if !settings.bus_velocity.is_finite() || settings.bus_velocity <= 0.0 {
            return Err(IngestionError::InvalidRoutingSettings(format!(
                "bus_velocity must be a positive number of km/h, got {}",
                settings.bus_velocity
            )));
        }
        Ok(settings)
    }

    pub fn render_settings(&self) -> RenderSettings {
        self.render_settings
            .as_ref()
            .map(RenderSettings::from)
            .unwrap_or_default()
    }

    /// Fills the catalogue: stops first, then the distances between them, then
    /// the buses. Names that do not resolve to a stop are skipped.
    pub fn populate(&self, catalogue: &mut Catalogue) {
        for stop in &self.stops {
            catalogue.add_stop(&stop.name, LatLng::new(stop.latitude, stop.longitude));
        }

        let mut count_unknown_neighbor = 0;
        let mut seen = HashSet::new();
        for stop in &self.stops {
            if !seen.insert(stop.name.as_str()) {
                debug!("Distances of repeated stop '{}' ignored", stop.name);
                continue;
            }
            let Some(from) = catalogue.stop_id(&stop.name) else {
                continue;
            };
            for (neighbor, &meters) in &stop.road_distances {
                match catalogue.stop_id(neighbor) {
                    Some(to) => catalogue.set_distance(from, to, meters),
                    None => count_unknown_neighbor += 1,
                }
            }
        }

        let mut count_unknown_route_stop = 0;
        for bus in &self.buses {
            let route: Vec<StopID> = bus
                .stops
                .iter()
                .filter_map(|name| {
                    let id = catalogue.stop_id(name);
                    if id.is_none() {
                        warn!("Bus '{}' references unknown stop '{name}'", bus.name);
                        count_unknown_route_stop += 1;
                    }
                    id
                })
                .collect();
            catalogue.add_bus(&bus.name, &route, bus.is_roundtrip);
        }

        info!("{} stops and {} buses parsed", self.stops.len(), self.buses.len());
        if count_unknown_neighbor > 0 {
            warn!(" - {count_unknown_neighbor} distances to unknown stops skipped");
        }
        if count_unknown_route_stop > 0 {
            warn!(" - {count_unknown_route_stop} unknown route stops skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK: &str = r#"
routing_settings:
  bus_wait_time: 6
  bus_velocity: 40
render_settings:
  width: 1200
  height: 500
  padding: 50
  line_width: 14
  stop_radius: 5
  bus_label_font_size: 20
  bus_label_offset: [7, 15]
  stop_label_font_size: 18
  stop_label_offset: [7, -3]
  underlayer_color: [255, 255, 255, 0.85]
  underlayer_width: 3
  color_palette: [green, [255, 160, 0], red]
stops:
  - name: Tolstopaltsevo
    latitude: 55.611087
    longitude: 37.20829
    road_distances:
      Marushkino: 3900
  - name: Marushkino
    latitude: 55.595884
    longitude: 37.209755
    road_distances:
      Rasskazovka: 9900
      Nowhere: 100
  - name: Rasskazovka
    latitude: 55.632761
    longitude: 37.333324
  - name: Tolstopaltsevo
    latitude: 0
    longitude: 0
buses:
  - name: "750"
    stops: [Tolstopaltsevo, Marushkino, Rasskazovka]
    is_roundtrip: false
  - name: "751"
    stops: [Tolstopaltsevo, Ghost, Marushkino, Tolstopaltsevo]
    is_roundtrip: true
"#;

    #[test]
    fn parses_and_populates() {
        let description = NetworkDescription::parse(NETWORK).unwrap();
        let mut c = Catalogue::new();
        description.populate(&mut c);

        assert_eq!(c.stop_count(), 3);
        assert_eq!(c.bus_count(), 2);

        let t = c.stop_id("Tolstopaltsevo").unwrap();
        let m = c.stop_id("Marushkino").unwrap();
        let r = c.stop_id("Rasskazovka").unwrap();
        assert_eq!(c.stop(t).unwrap().lat_lng, LatLng::new(55.611087, 37.20829));
        assert_eq!(c.distance(t, m), 3900);
        assert_eq!(c.distance(m, t), 3900);
        assert_eq!(c.distance(r, m), 9900);

        let b750 = c.bus(c.bus_id("750").unwrap()).unwrap();
        assert_eq!(b750.route, vec![t, m, r, m, t]);
        let b751 = c.bus(c.bus_id("751").unwrap()).unwrap();
        assert_eq!(b751.route, vec![t, m, t]);
        assert_eq!(b751.unique_stops, 2);
    }

    #[test]
    fn repeated_stop_keeps_first_distances() {
        let description = NetworkDescription::parse(
            "routing_settings:\n  bus_wait_time: 2\n  bus_velocity: 30\n\
             stops:\n  - {name: A, latitude: 0, longitude: 0, road_distances: {B: 1000}}\n  \
             - {name: B, latitude: 0, longitude: 0.01}\n  \
             - {name: A, latitude: 9, longitude: 9, road_distances: {B: 5000}}\n",
        )
        .unwrap();
        let mut c = Catalogue::new();
        description.populate(&mut c);

        let a = c.stop_id("A").unwrap();
        let b = c.stop_id("B").unwrap();
        assert_eq!(c.stop_count(), 2);
        assert_eq!(c.stop(a).unwrap().lat_lng, LatLng::new(0.0, 0.0));
        assert_eq!(c.distance(a, b), 1000);
        assert_eq!(c.distance(b, a), 1000);
    }

    #[test]
    fn render_settings_colors() {
        let description = NetworkDescription::parse(NETWORK).unwrap();
        let render = description.render_settings();
        assert_eq!(render.bus_label_offset, (7.0, 15.0));
        assert_eq!(render.underlayer_color, Color::Rgba(255, 255, 255, 0.85));
        assert_eq!(
            render.color_palette,
            vec![
                Color::Named("green".to_string()),
                Color::Rgb(255, 160, 0),
                Color::Named("red".to_string()),
            ]
        );
    }

    #[test]
    fn render_settings_default_when_absent() {
        let description = NetworkDescription::parse(
            "routing_settings:\n  bus_wait_time: 2\n  bus_velocity: 30\n",
        )
        .unwrap();
        assert_eq!(description.render_settings(), RenderSettings::default());
        assert!(description.stops.is_empty());
    }

    #[test]
    fn rejects_zero_velocity() {
        let description = NetworkDescription::parse(
            "routing_settings:\n  bus_wait_time: 2\n  bus_velocity: 0\n",
        )
        .unwrap();
        assert!(matches!(
            description.routing_settings(),
            Err(IngestionError::InvalidRoutingSettings(_))
        ));
    }
}
