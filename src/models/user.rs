use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::error::{AppError, Result};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    Superadmin,
    Manager,
    Employee,
    Customer,
}

/// Account approval state, managed by super-admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Approved,
    Rejected,
    Deactivated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub logged_in: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountFields {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AccountFields {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Name is required".into()));
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(AppError::BadRequest("A valid email is required".into())),
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSignup {
    #[serde(flatten)]
    pub account: AccountFields,
    pub manager_id: i64,
    #[serde(default)]
    pub mobile_no: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSignup {
    #[serde(flatten)]
    pub account: AccountFields,
    pub mobile_no: String,
    pub company_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSignup {
    #[serde(flatten)]
    pub account: AccountFields,
    pub mobile_no: String,
    pub address: String,
}

/// Body of `POST /api/auth/signup`, discriminated by `role`.
/// Super-admin accounts cannot be created through signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum SignupRequest {
    Employee(EmployeeSignup),
    Manager(ManagerSignup),
    Customer(CustomerSignup),
}

/// Digits with an optional leading `+`, 7 to 15 digits long.
pub fn validate_mobile_no(mobile_no: &str) -> Result<()> {
    let digits = mobile_no.trim().strip_prefix('+').unwrap_or(mobile_no.trim());
    if !(7..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest("Invalid mobile number".into()));
    }
    Ok(())
}

impl SignupRequest {
    pub fn account(&self) -> &AccountFields {
        match self {
            SignupRequest::Employee(s) => &s.account,
            SignupRequest::Manager(s) => &s.account,
            SignupRequest::Customer(s) => &s.account,
        }
    }

    pub fn role(&self) -> UserRole {
        match self {
            SignupRequest::Employee(_) => UserRole::Employee,
            SignupRequest::Manager(_) => UserRole::Manager,
            SignupRequest::Customer(_) => UserRole::Customer,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.account().validate()?;
        match self {
            SignupRequest::Employee(s) => {
                if s.manager_id <= 0 {
                    return Err(AppError::BadRequest("Manager ID required for employee".into()));
                }
                if let Some(mobile_no) = &s.mobile_no {
                    validate_mobile_no(mobile_no)?;
                }
            }
            SignupRequest::Manager(s) => {
                if s.company_name.trim().is_empty() {
                    return Err(AppError::BadRequest("Company name is required for manager".into()));
                }
                validate_mobile_no(&s.mobile_no)?;
            }
            SignupRequest::Customer(s) => {
                if s.address.trim().is_empty() {
                    return Err(AppError::BadRequest("Address is required for customer".into()));
                }
                validate_mobile_no(&s.mobile_no)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPassword {
    pub email: String,
    pub new_password: String,
}

/// `check: true` approves; `null` or `false` rejects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveUser {
    pub id: i64,
    #[serde(default)]
    pub check: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeactivateUser {
    pub id: i64,
}
