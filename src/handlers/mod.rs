pub mod admin;
pub mod auth;
pub mod products;

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::db::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// All API routes, mounted under `/api`.
pub fn router(state: AppState) -> Router<AppState> {
    let api = Router::new()
        .route("/health", get(health))
        .merge(products::router())
        .merge(auth::router())
        .merge(admin::router(state));

    Router::new().nest("/api", api)
}
