mod managers;
mod users;

pub use managers::*;
pub use users::*;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::db::AppState;
use crate::middleware::require_superadmin;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // Manager payments
        .route("/admin/managers", get(list_managers))
        .route("/admin/add_payment", post(add_payment))
        // Account approval
        .route("/admin/login_requests", get(list_login_requests))
        .route("/admin/approve_user", post(approve_user))
        .route("/admin/active_users", get(list_active_users))
        .route("/admin/deactivate_user", post(deactivate_user))
        .layer(middleware::from_fn_with_state(state, require_superadmin))
}
