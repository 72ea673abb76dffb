use async_graphql::SimpleObject;

use crate::structures::plan::PlanItem;

#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct Plan {
    /// Minutes from the first boarding wait to the last arrival.
    pub total_time: f64,
    pub items: Vec<PlanItem>,
}
