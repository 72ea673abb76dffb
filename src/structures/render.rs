use serde::{Deserialize, Serialize};

use crate::structures::LatLng;

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Color {
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
}

impl Default for Color {
    fn default() -> Self {
        Color::Named("none".to_string())
    }
}

/// Map drawing parameters. Stored in the snapshot for the renderer, never
/// interpreted by routing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,
    pub bus_label_font_size: u32,
    pub bus_label_offset: (f64, f64),
    pub stop_label_font_size: u32,
    pub stop_label_offset: (f64, f64),
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    pub color_palette: Vec<Color>,
}

/// Projection of geographic coordinates onto the drawing canvas, derived from
/// the bounding box of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    padding: f64,
    min_lon: f64,
    max_lat: f64,
    zoom: f64,
}

impl MapProjection {
    pub fn new<'a>(points: impl IntoIterator<Item = &'a LatLng>, settings: &RenderSettings) -> Self {
        let mut points = points.into_iter().peekable();
        if points.peek().is_none() {
            return MapProjection {
                padding: settings.padding,
                min_lon: 0.0,
                max_lat: 0.0,
                zoom: 0.0,
            };
        }

        let (mut min_lat, mut max_lat) = (f64::MAX, f64::MIN);
        let (mut min_lon, mut max_lon) = (f64::MAX, f64::MIN);
        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lon = min_lon.min(p.longitude);
            max_lon = max_lon.max(p.longitude);
        }

        let width_zoom = (max_lon - min_lon > EPSILON)
            .then(|| (settings.width - 2.0 * settings.padding) / (max_lon - min_lon));
        let height_zoom = (max_lat - min_lat > EPSILON)
            .then(|| (settings.height - 2.0 * settings.padding) / (max_lat - min_lat));

        let zoom = match (width_zoom, height_zoom) {
            (Some(w), Some(h)) => w.min(h),
            (Some(w), None) => w,
            (None, Some(h)) => h,
            (None, None) => 0.0,
        };

        MapProjection {
            padding: settings.padding,
            min_lon,
            max_lat,
            zoom,
        }
    }

    /// Canvas point `(x, y)` for a coordinate.
    pub fn project(&self, p: LatLng) -> (f64, f64) {
        (
            (p.longitude - self.min_lon) * self.zoom + self.padding,
            (self.max_lat - p.latitude) * self.zoom + self.padding,
        )
    }
}
