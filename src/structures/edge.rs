use std::fmt::Display;

use crate::structures::BusID;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexID(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeID(pub usize);

impl Display for VertexID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Display for EdgeID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Boarding `bus` at `from` and riding `span_count` hops to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeData {
    pub from: VertexID,
    pub to: VertexID,
    /// Minutes, waiting included.
    pub weight: f64,
    pub bus: BusID,
    pub span_count: u32,
}
