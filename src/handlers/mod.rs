//! Shared HTTP plumbing: application state and the liveness probe.

pub mod http;
