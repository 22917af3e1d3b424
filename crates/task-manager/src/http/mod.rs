//! REST routes under `/api/tasks`.

mod cors;
mod error;
mod schemas;
mod tasks;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use task_manager_app::{ServerConfig, TaskService, TaskStore};
use tower_http::trace::TraceLayer;

pub use cors::cors_layer;
pub use error::ServerError;
pub use schemas::{ListTasksParams, TaskPayload};

/// Base path of the task resource.
pub const TASKS_PATH: &str = "/api/tasks";

/// Shared state handed to every handler.
pub struct AppState<S> {
    service: Arc<TaskService<S>>,
}

impl<S> AppState<S> {
    /// Wrap a service for sharing across requests.
    #[must_use]
    pub fn new(service: TaskService<S>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Handle to the shared service.
    #[must_use]
    pub fn service(&self) -> Arc<TaskService<S>> {
        Arc::clone(&self.service)
    }
}

// Derived Clone would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Build the application router with tracing and CORS layers applied.
#[must_use]
pub fn build_router<S>(service: TaskService<S>, config: &ServerConfig) -> Router
where
    S: TaskStore + Send + Sync + 'static,
{
    Router::new()
        .route(TASKS_PATH, get(tasks::list::<S>).post(tasks::create::<S>))
        .route(
            "/api/tasks/{id}",
            get(tasks::show::<S>)
                .put(tasks::update::<S>)
                .delete(tasks::delete::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(AppState::new(service))
}
