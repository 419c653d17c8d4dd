//! REST API for the dashboard
//!
//! Serves the rendered chart datasets as JSON. The dataset is loaded once at
//! startup and shared read-only across requests.

pub mod handlers;
pub mod service;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use service::DashboardService;

pub fn create_router(service: Arc<DashboardService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/bounds", get(handlers::get_bounds))
        .route("/api/v1/dashboard", get(handlers::get_dashboard))
        .route("/api/v1/drilldown", get(handlers::get_drilldown))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
