//! Request middleware: bearer-token access filter and path patterns.

pub mod auth;
pub mod path;

pub use auth::{require_bearer, AccessFilter};
pub use path::PathPattern;
