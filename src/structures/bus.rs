use std::fmt::Display;

use crate::structures::StopID;

#[derive(Debug, Clone, PartialEq)]
pub struct Bus {
    pub name: String,
    /// Physical path. Linear routes already include the way back.
    pub route: Vec<StopID>,
    pub is_roundtrip: bool,
    pub unique_stops: usize,
    pub start_stop: Option<StopID>,
    pub end_stop: Option<StopID>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusID(pub usize);

impl Display for BusID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Bus {
    /// Expands the listed stops into the stored route.
    ///
    /// Round-trip routes are kept as listed. Linear routes are the forward list
    /// followed by its reverse without the repeated terminal.
    pub fn new(name: &str, stops: &[StopID], is_roundtrip: bool) -> Bus {
        let mut route = stops.to_vec();
        if !is_roundtrip && stops.len() > 1 {
            route.extend(stops.iter().rev().skip(1));
        }

        let mut unique = stops.to_vec();
        unique.sort_unstable();
        unique.dedup();

        Bus {
            name: name.to_string(),
            route,
            is_roundtrip,
            unique_stops: unique.len(),
            start_stop: stops.first().copied(),
            end_stop: stops.last().copied(),
        }
    }

    /// Position of the turnaround stop of a linear route.
    pub fn midpoint(&self) -> Option<usize> {
        if self.is_roundtrip || self.route.is_empty() {
            None
        } else {
            Some(self.route.len() / 2)
        }
    }
}
