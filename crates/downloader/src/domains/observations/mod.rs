mod data_type;
mod schema;
mod table;
mod url;

pub use data_type::*;
pub use schema::*;
pub use table::*;
pub use url::*;
