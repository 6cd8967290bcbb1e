//! Business logic: admin state transitions on users.

pub mod users;
