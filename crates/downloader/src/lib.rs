mod batch;
mod domains;
mod error;
mod fetcher;
mod updater;
mod utils;
mod writer;

pub use batch::*;
pub use domains::*;
pub use error::AmedasError;
pub use fetcher::*;
pub use updater::*;
pub use utils::*;
pub use writer::*;
