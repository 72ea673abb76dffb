mod builder;
mod router;
pub mod routing;

pub use builder::build_graph;
pub use router::{RouteInfo, RouteInternalData, Router};
