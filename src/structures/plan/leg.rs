use async_graphql::{SimpleObject, Union};

#[derive(Debug, Clone, PartialEq, Union)]
pub enum PlanItem {
    Wait(PlanWaitLeg),
    Bus(PlanBusLeg),
}

#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct PlanWaitLeg {
    pub stop_name: String,
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct PlanBusLeg {
    pub bus: String,
    pub span_count: u32,
    pub time: f64,
}
