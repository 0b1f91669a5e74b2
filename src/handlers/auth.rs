use axum::{Router, extract::State, routing::post};
use serde::Serialize;

use crate::crypto::{hash_password_blocking, verify_password_blocking};
use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::jwt::SessionClaims;
use crate::models::{
    ForgotPassword, LoginRequest, LoginResponse, MIN_PASSWORD_LEN, SignupRequest, SignupResponse,
    UserStatus, UserSummary,
};
use crate::util::normalize_email;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Register a manager, employee or customer. New accounts wait for
/// super-admin approval before they can log in.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> Result<Json<SignupResponse>> {
    input.validate()?;

    let email = normalize_email(&input.account().email);
    let password_hash = hash_password_blocking(input.account().password.clone()).await?;

    let mut conn = state.db.get()?;
    let user = queries::create_account(&mut conn, &input, &email, &password_hash)?;

    tracing::info!(user_id = user.id, role = user.role.as_ref(), "user signed up");

    Ok(Json(SignupResponse {
        message: "User created".into(),
        user: UserSummary::from(&user),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = normalize_email(&input.email);
    let user = {
        let conn = state.db.get()?;
        queries::get_user_by_email(&conn, &email)?
    };

    // Unknown email and wrong password are indistinguishable to the caller
    let verified = match &user {
        Some(user) => verify_password_blocking(input.password, user.password_hash.clone()).await?,
        None => false,
    };
    let user = user
        .filter(|_| verified)
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    match user.status {
        UserStatus::Approved => {}
        UserStatus::Pending => {
            return Err(AppError::Forbidden("Account is awaiting approval".into()));
        }
        UserStatus::Rejected => {
            return Err(AppError::Forbidden("Account was rejected".into()));
        }
        UserStatus::Deactivated => {
            return Err(AppError::Forbidden("Account is deactivated".into()));
        }
    }

    let token = state.sessions.issue(SessionClaims {
        user_id: user.id,
        role: user.role,
    })?;
    let conn = state.db.get()?;
    queries::set_logged_in(&conn, user.id, true)?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(LoginResponse { token }))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPassword>,
) -> Result<Json<MessageResponse>> {
    if input.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let user = {
        let conn = state.db.get()?;
        queries::get_user_by_email(&conn, &normalize_email(&input.email))?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?
    };

    let password_hash = hash_password_blocking(input.new_password).await?;
    let conn = state.db.get()?;
    queries::update_password(&conn, user.id, &password_hash)?;

    tracing::info!(user_id = user.id, "password reset");

    Ok(Json(MessageResponse {
        message: "Password updated successfully".into(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
}
