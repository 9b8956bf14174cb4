mod observations;
mod stations;

pub use observations::*;
pub use stations::*;
