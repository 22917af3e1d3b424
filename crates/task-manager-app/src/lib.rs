//! Application layer logic for task-manager.
//!
//! This crate provides the task service, the storage abstraction it runs on,
//! query construction from user-facing inputs, and server configuration shared
//! by the HTTP server and the CLI.

pub mod config;
pub mod filter_util;
pub mod memory_store;
pub mod service;
pub mod task_store;

// Re-exports for convenience
pub use config::ServerConfig;
pub use filter_util::{QueryBuildError, TaskQueryBuilder, normalize_timestamp, parse_timestamp};
pub use memory_store::MemoryStore;
pub use service::{TaskService, TaskView};
pub use task_store::TaskStore;
