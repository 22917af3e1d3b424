use axum::http::HeaderValue;
use task_manager_app::ServerConfig;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// CORS policy for the API.
///
/// Any origin is allowed unless `cors_allowed_origins` lists at least one
/// valid origin.
#[must_use]
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    let Some(configured) = &config.cors_allowed_origins else {
        return base.allow_origin(Any);
    };

    let origins: Vec<HeaderValue> = configured
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(origins)
    }
}
