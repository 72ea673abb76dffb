use std::fmt::Display;

use serde::{Deserialize, Serialize};

const EARTH_RADIUS: f64 = 6_371_000.0;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        LatLng {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in meters (spherical law of cosines).
    pub fn dist(&self, other: Self) -> f64 {
        if self == &other {
            return 0.0;
        }

        let cos_angle = self.latitude.to_radians().sin() * other.latitude.to_radians().sin()
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (self.longitude - other.longitude).abs().to_radians().cos();

        // rounding can push the cosine slightly outside [-1, 1] for close points
        cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let p = LatLng::new(55.611087, 37.20829);
        assert_eq!(p.dist(p), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = LatLng::new(55.611087, 37.20829);
        let b = LatLng::new(55.595884, 37.209755);
        assert!((a.dist(b) - b.dist(a)).abs() < 1e-9);
    }

    #[test]
    fn one_hundredth_degree_on_equator() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 0.01);
        let expected = 0.01_f64.to_radians() * EARTH_RADIUS;
        assert!((a.dist(b) - expected).abs() < 0.5);
    }
}
