//! Authentication: login, register, token issuance, password hashing.

mod handlers;
mod service;
mod token;

pub use handlers::{login, register};
pub use service::CredentialService;
pub use token::{Claims, TokenService};
