use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::models::{User, UserRole, UserStatus};
use crate::util::extract_bearer_token;

/// The authenticated super-admin, inserted as a request extension.
#[derive(Clone)]
pub struct AdminContext {
    pub user: User,
}

/// Authenticate a user from the bearer token.
///
/// The token must verify, and the user it names must still exist and be
/// approved; a token outlives neither deactivation nor deletion.
fn authenticate_user(state: &AppState, headers: &HeaderMap) -> Result<User> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("Authorization token missing".into()))?;
    let claims = state.sessions.verify(token)?;

    let conn = state.db.get()?;
    let user = queries::get_user_by_id(&conn, claims.user_id)?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;

    if user.status != UserStatus::Approved {
        return Err(AppError::Unauthorized("Account is not active".into()));
    }

    Ok(user)
}

pub async fn require_superadmin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user = authenticate_user(&state, request.headers())?;
    if !matches!(user.role, UserRole::Superadmin) {
        tracing::warn!(user_id = user.id, role = user.role.as_ref(), "non-admin hit admin route");
        return Err(AppError::Forbidden("Super-admin access required".into()));
    }
    request.extensions_mut().insert(AdminContext { user });
    Ok(next.run(request).await)
}
