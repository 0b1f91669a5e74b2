//! Shared utility functions for the storefront admin service.

use axum::http::HeaderMap;
use chrono::{DateTime, Duration, Utc};
use unicode_normalization::UnicodeNormalization;

use crate::error::{AppError, Result};

/// Compute a manager's new access expiry after a payment.
///
/// If the stored expiry (`current`, unix seconds) is still in the future
/// relative to `now`, the extension is added on top of it. Otherwise the
/// window restarts from `now`. Fails with `InvalidState` when the stored
/// value or the result is not a representable date.
pub fn extend_validity(
    current: Option<i64>,
    now: DateTime<Utc>,
    extension_days: i64,
) -> Result<DateTime<Utc>> {
    let current = match current {
        Some(ts) => Some(DateTime::<Utc>::from_timestamp(ts, 0).ok_or_else(|| {
            AppError::InvalidState(format!("Stored validity {} is not a valid date", ts))
        })?),
        None => None,
    };

    let base = match current {
        Some(expiry) if expiry >= now => expiry,
        _ => now,
    };

    Duration::try_days(extension_days)
        .and_then(|d| base.checked_add_signed(d))
        .ok_or_else(|| AppError::InvalidState("Generated an invalid date for validity".into()))
}

/// Lowercase, trim and NFKC-normalize an email so lookups are stable.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

/// Extract a Bearer token from the Authorization header.
///
/// Returns the token string without the "Bearer " prefix, or None if
/// the header is missing, malformed, or empty after the prefix.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}
