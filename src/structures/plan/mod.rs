mod leg;
mod plan;
mod stat;
mod stop;
mod stop_buses;

pub use leg::*;
pub use plan::*;
pub use stat::*;
pub use stop::*;
pub use stop_buses::*;
