use async_graphql::SimpleObject;

/// Statistics of one bus route.
#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct PlanBusStat {
    /// Road length over great-circle length. `null` when the route covers no
    /// geographic distance, as for a one-stop bus.
    pub curvature: Option<f64>,
    pub route_length: u64,
    pub stop_count: usize,
    pub unique_stop_count: usize,
}
