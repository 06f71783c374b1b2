//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the CORS layer from a `SHELF_CORS_ORIGINS` value
///
/// `*` allows any origin, otherwise a comma-separated origin list. Without a
/// value only local development origins are allowed.
pub fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let allow_origin = match origins {
        Some("*") => AllowOrigin::any(),
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            AllowOrigin::list(allowed)
        }
        None => AllowOrigin::list([
            HeaderValue::from_static("http://localhost:8080"),
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://127.0.0.1:8080"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ]),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router
pub fn create_router(state: AppState, cors_origins: Option<&str>) -> Router {
    Router::new()
        .route(
            "/books",
            get(handlers::list_books).post(handlers::create_book),
        )
        .route("/books/:id", get(handlers::get_book))
        .route("/checkout", patch(handlers::checkout_book))
        .route("/return", patch(handlers::return_book))
        .route("/sync", get(handlers::sync_events))
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
        .with_state(state)
}
