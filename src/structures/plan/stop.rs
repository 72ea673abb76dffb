use async_graphql::SimpleObject;

use crate::structures::Stop;

#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct PlanStop {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl PlanStop {
    pub fn from_stop(stop: &Stop) -> PlanStop {
        PlanStop {
            name: stop.name.clone(),
            lat: stop.lat_lng.latitude,
            lon: stop.lat_lng.longitude,
        }
    }
}
