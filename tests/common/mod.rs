//! Shared helpers for integration tests.
#![allow(dead_code)]

pub use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
pub use serde_json::{Value, json};
pub use tower::ServiceExt;

pub use storefront_admin::db::{AppState, queries};
pub use storefront_admin::models::*;

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use storefront_admin::crypto::hash_password;
use storefront_admin::db::create_pool;
use storefront_admin::jwt::{SessionClaims, SessionKeys};
use tempfile::TempDir;

pub const TEST_JWT_SECRET: &[u8] = b"test-jwt-secret-for-integration-tests";
pub const TEST_PASSWORD: &str = "correct-horse-battery";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// A fresh on-disk database plus the state the router runs with.
///
/// Pooled in-memory SQLite would give every connection its own database,
/// so tests use a file in a temp dir that lives as long as the app.
pub struct TestApp {
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("test.db");
        let pool = create_pool(path.to_str().unwrap(), 4).expect("Failed to create pool");

        Self {
            state: AppState {
                db: pool,
                sessions: SessionKeys::new(TEST_JWT_SECRET, 24),
            },
            _dir: dir,
        }
    }

    pub fn router(&self) -> Router {
        storefront_admin::app(self.state.clone())
    }

    pub fn conn(&self) -> PooledConnection<SqliteConnectionManager> {
        self.state.db.get().expect("Failed to get connection")
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state
            .sessions
            .issue(SessionClaims {
                user_id: user.id,
                role: user.role,
            })
            .expect("Failed to issue token")
    }

    /// Send a request through the full router and decode the JSON body
    /// (`Value::Null` when there is none).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, token, Some(body)).await
    }

    /// Approved super-admin and a session token for it.
    pub fn superadmin(&self) -> (User, String) {
        storefront_admin::bootstrap_superadmin(&self.state.db, ADMIN_EMAIL, TEST_PASSWORD)
            .expect("Failed to bootstrap super-admin");
        let user = queries::get_user_by_email(&self.conn(), ADMIN_EMAIL)
            .unwrap()
            .expect("super-admin missing");
        let token = self.token_for(&user);
        (user, token)
    }

    /// Sign up an account directly through the query layer.
    pub fn signup(&self, request: &SignupRequest, status: UserStatus) -> User {
        let email = storefront_admin::util::normalize_email(&request.account().email);
        let hash = hash_password(&request.account().password).unwrap();
        let mut conn = self.conn();
        let user = queries::create_account(&mut conn, request, &email, &hash)
            .expect("Failed to create account");
        if status != UserStatus::Pending {
            queries::set_user_status(&conn, user.id, status).unwrap();
        }
        queries::get_user_by_id(&conn, user.id).unwrap().unwrap()
    }

    /// Approved manager account; returns its user row and manager row.
    pub fn manager(&self, email: &str) -> (User, Manager) {
        let user = self.signup(&manager_signup(email), UserStatus::Approved);
        let manager = queries::list_managers(&self.conn())
            .unwrap()
            .into_iter()
            .find(|m| m.user_id == user.id)
            .expect("manager row missing");
        (user, manager)
    }

    /// Overwrite a manager's stored validity (unix seconds).
    pub fn set_validity(&self, manager_id: i64, validity: Option<i64>) {
        self.conn()
            .execute(
                "UPDATE managers SET validity = ?1 WHERE id = ?2",
                rusqlite::params![validity, manager_id],
            )
            .unwrap();
    }
}

pub fn account(name: &str, email: &str) -> AccountFields {
    AccountFields {
        name: name.to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
    }
}

pub fn manager_signup(email: &str) -> SignupRequest {
    SignupRequest::Manager(ManagerSignup {
        account: account("Test Manager", email),
        mobile_no: "+15551234567".to_string(),
        company_name: "Acme Ltd".to_string(),
    })
}

pub fn customer_signup(email: &str) -> SignupRequest {
    SignupRequest::Customer(CustomerSignup {
        account: account("Test Customer", email),
        mobile_no: "5551234567".to_string(),
        address: "1 Main Street".to_string(),
    })
}

pub fn employee_signup(email: &str, manager_id: i64) -> SignupRequest {
    SignupRequest::Employee(EmployeeSignup {
        account: account("Test Employee", email),
        manager_id,
        mobile_no: None,
    })
}

pub const DAY: i64 = 86_400;
