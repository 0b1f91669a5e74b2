use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
    pub manager_id: i64,
    pub user_id: i64,
    pub manager_name: String,
    pub email: String,
    pub mobile_no: String,
    pub company_name: String,
    pub rate_per_day: f64,
    /// Access expiry, unix seconds. `None` = never paid.
    pub validity: Option<i64>,
    pub created_at: i64,
}

/// Body of `POST /api/admin/add_payment`.
///
/// `validity` is the extension length in days. When it is absent, `amount`
/// is converted to days at `rate_per_day`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPayment {
    pub manager_id: i64,
    pub rate_per_day: f64,
    #[serde(default)]
    pub validity: Option<i64>,
    #[serde(default)]
    pub amount: Option<f64>,
}

impl AddPayment {
    /// Validate the request and resolve the number of days to extend by.
    pub fn extension_days(&self) -> Result<i64> {
        if !self.rate_per_day.is_finite() || self.rate_per_day < 0.0 {
            return Err(AppError::BadRequest(
                "ratePerDay must be a non-negative number".into(),
            ));
        }

        let days = match (self.validity, self.amount) {
            (Some(days), _) => days,
            (None, Some(amount)) => validity_days_for_amount(amount, self.rate_per_day)?,
            (None, None) => {
                return Err(AppError::BadRequest(
                    "Either validity (days) or amount is required".into(),
                ));
            }
        };

        if days <= 0 {
            return Err(AppError::BadRequest(
                "validity must be a positive number of days".into(),
            ));
        }
        Ok(days)
    }
}

/// Whole days bought by a recharge `amount` at `rate_per_day`.
pub fn validity_days_for_amount(amount: f64, rate_per_day: f64) -> Result<i64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::BadRequest("amount must be a positive number".into()));
    }
    if !rate_per_day.is_finite() || rate_per_day <= 0.0 {
        return Err(AppError::BadRequest(
            "ratePerDay must be positive to convert an amount into days".into(),
        ));
    }
    let days = (amount / rate_per_day).floor();
    if days > i32::MAX as f64 {
        return Err(AppError::BadRequest("amount buys too many days".into()));
    }
    Ok(days as i64)
}
