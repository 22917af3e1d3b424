//! HTTP facade for task-manager.
//!
//! The binary in `main.rs` wires configuration, tracing, and the JSON file
//! store into the router exposed here; tests drive the same router in-process.

pub mod http;

pub use http::{AppState, build_router};
