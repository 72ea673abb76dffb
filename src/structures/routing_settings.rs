use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RoutingSettings {
    pub bus_wait_time: u32, // minutes per boarding
    pub bus_velocity: f64,  // km/h
}

impl RoutingSettings {
    /// Bus velocity in meters per minute.
    pub fn velocity_m_per_min(&self) -> f64 {
        self.bus_velocity * 1000.0 / 60.0
    }
}
