//! HTTP service for the todo resource.
//!
//! # Overview
//! Four routes under `/todo` list, create, update and delete todos held in a
//! document store. Handlers share one store handle through `AppState`;
//! `lifecycle::serve` supervises the listener and the ordered shutdown.
//!
//! # Design
//! - `store::TodoStore` is the only thing handlers know about storage, so
//!   the MongoDB backend and the in-memory backend are interchangeable.
//! - `error::ApiError` turns every failure into an envelope response;
//!   nothing but startup and shutdown errors escapes the HTTP layer.
//! - Requests are cancelled as a unit: a dropped connection or the request
//!   timeout drops the handler future together with its storage call.

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, put},
    BoxError, Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod store;

pub use config::{Config, ConfigError, StorageMode};
pub use error::{ApiError, StorageAction};
pub use handlers::AppState;
pub use lifecycle::{LifecycleError, ShutdownBudget};
pub use store::{InMemoryStore, MongoStore, StoreError, TodoStore};

/// Builds the router with request tracing and a per-request timeout.
///
/// A request that outlives `request_timeout` is dropped and answered with
/// the `ApiError::Timeout` envelope.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route(
            "/todo",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todo/",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todo/{id}",
            put(handlers::update_todo).delete(handlers::delete_todo),
        )
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |error: BoxError| async move {
                    ApiError::from_middleware(error, request_timeout)
                }))
                .timeout(request_timeout),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
