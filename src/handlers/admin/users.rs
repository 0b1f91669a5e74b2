use axum::extract::{Extension, State};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::middleware::AdminContext;
use crate::models::{ApproveUser, DeactivateUser, User, UserRole, UserStatus};

/// Accounts waiting for approval.
pub async fn list_login_requests(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let conn = state.db.get()?;
    Ok(Json(queries::list_users_by_status(&conn, UserStatus::Pending)?))
}

pub async fn list_active_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let conn = state.db.get()?;
    Ok(Json(queries::list_users_by_status(&conn, UserStatus::Approved)?))
}

fn load_managed_user(state: &AppState, ctx: &AdminContext, id: i64) -> Result<User> {
    if id == ctx.user.id {
        return Err(AppError::BadRequest("Cannot change your own account".into()));
    }
    let conn = state.db.get()?;
    let user = queries::get_user_by_id(&conn, id)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    if user.role == UserRole::Superadmin {
        return Err(AppError::BadRequest("Super-admin accounts cannot be changed".into()));
    }
    Ok(user)
}

fn change_status(state: &AppState, user: &User, status: UserStatus) -> Result<User> {
    let conn = state.db.get()?;
    queries::set_user_status(&conn, user.id, status)?;
    queries::get_user_by_id(&conn, user.id)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Approve (`check: true`) or reject (`check: null/false`) an account.
pub async fn approve_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Json(input): Json<ApproveUser>,
) -> Result<Json<User>> {
    let user = load_managed_user(&state, &ctx, input.id)?;
    let status = if input.check == Some(true) {
        UserStatus::Approved
    } else {
        UserStatus::Rejected
    };

    let updated = change_status(&state, &user, status)?;
    tracing::info!(user_id = user.id, admin_id = ctx.user.id, status = status.as_ref(), "account reviewed");
    Ok(Json(updated))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Json(input): Json<DeactivateUser>,
) -> Result<Json<User>> {
    let user = load_managed_user(&state, &ctx, input.id)?;
    let updated = change_status(&state, &user, UserStatus::Deactivated)?;
    tracing::info!(user_id = user.id, admin_id = ctx.user.id, "account deactivated");
    Ok(Json(updated))
}
