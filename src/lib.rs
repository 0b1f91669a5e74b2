pub mod catalog;
pub mod client;
pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod util;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::{AppState, DbPool, queries};
use crate::error::Result;
use crate::models::User;

/// The full HTTP application with tracing and CORS applied.
pub fn app(state: AppState) -> Router {
    handlers::router(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create an approved super-admin for `email` unless one already exists.
///
/// Returns the new user, or `None` when the email was already taken.
pub fn bootstrap_superadmin(pool: &DbPool, email: &str, password: &str) -> Result<Option<User>> {
    let email = util::normalize_email(email);
    let conn = pool.get()?;
    if queries::get_user_by_email(&conn, &email)?.is_some() {
        return Ok(None);
    }
    let hash = crypto::hash_password(password)?;
    queries::ensure_superadmin(&conn, "Super Admin", &email, &hash)
}
