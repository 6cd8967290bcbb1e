//! Data models: user representation, roles, statuses.

pub mod user;

pub use user::*;
