use axum::extract::{Extension, State};
use chrono::Utc;

use crate::db::{AppState, queries};
use crate::error::Result;
use crate::extractors::Json;
use crate::middleware::AdminContext;
use crate::models::{AddPayment, Manager};

pub async fn list_managers(State(state): State<AppState>) -> Result<Json<Vec<Manager>>> {
    let conn = state.db.get()?;
    let managers = queries::list_managers(&conn)?;
    Ok(Json(managers))
}

/// Record a manager payment: new daily rate plus a validity extension.
pub async fn add_payment(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Json(input): Json<AddPayment>,
) -> Result<Json<Manager>> {
    let days = input.extension_days()?;

    let mut conn = state.db.get()?;
    let manager = queries::apply_manager_payment(
        &mut conn,
        input.manager_id,
        input.rate_per_day,
        days,
        Utc::now(),
    )?;

    tracing::info!(
        manager_id = manager.manager_id,
        admin_id = ctx.user.id,
        extension_days = days,
        validity = ?manager.validity,
        "manager payment recorded"
    );

    Ok(Json(manager))
}
