mod registry;
mod search;
mod station;

pub use registry::*;
pub use search::*;
pub use station::*;
