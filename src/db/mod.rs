//! Database layer: pool and repositories for PostgreSQL.

mod pool;
mod repositories;

pub use pool::{create_pool, DbPool};
pub use repositories::*;
