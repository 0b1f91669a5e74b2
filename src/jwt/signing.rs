use jwt_simple::prelude::*;

use crate::error::{AppError, Result};

use super::SessionClaims;

/// HS256 key used to issue and verify session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    key: HS256Key,
    ttl_hours: u64,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl_hours: u64) -> Self {
        Self {
            key: HS256Key::from_bytes(secret),
            ttl_hours,
        }
    }

    pub fn issue(&self, session: SessionClaims) -> Result<String> {
        let subject = session.user_id.to_string();
        let claims = Claims::with_custom_claims(session, Duration::from_hours(self.ttl_hours))
            .with_subject(subject);
        self.key
            .authenticate(claims)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature and expiry. Any failure is reported as Unauthorized.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        self.key
            .verify_token::<SessionClaims>(token, None)
            .map(|claims| claims.custom)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))
    }
}
