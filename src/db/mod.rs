pub mod pool;
pub mod queries;

pub use pool::{create_pool, ensure_schema};
pub use queries::*;
