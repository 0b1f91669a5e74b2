use serde::{Deserialize, Serialize};

use crate::models::UserRole;

/// Custom claims carried by a login session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub role: UserRole,
}
