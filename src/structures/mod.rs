mod bus;
mod catalogue;
mod config;
mod edge;
mod geo;
mod graph;
mod network;
mod node;
pub mod plan;
mod render;
mod routing_settings;

pub use bus::*;
pub use catalogue::*;
pub use config::*;
pub use edge::*;
pub use geo::*;
pub use graph::*;
pub use network::*;
pub use node::*;
pub use render::*;
pub use routing_settings::*;
