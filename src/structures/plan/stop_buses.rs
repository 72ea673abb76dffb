use async_graphql::SimpleObject;

/// Buses passing through a stop, by name.
#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct PlanStopBuses {
    pub name: String,
    pub buses: Vec<String>,
}
