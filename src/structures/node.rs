use std::fmt::Display;

use crate::structures::LatLng;

#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub name: String,
    pub lat_lng: LatLng,
}

/// Index of a stop in the catalogue arena. Never reused or invalidated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopID(pub usize);

impl Display for StopID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Stop {
    pub fn loc(&self) -> LatLng {
        self.lat_lng
    }
}
