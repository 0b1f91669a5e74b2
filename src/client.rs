//! HTTP client for the storefront admin API.
//!
//! Admin-only calls need a bearer token from [`AdminClient::login`] (or
//! [`AdminClient::with_token`]); without one they fail locally before any
//! request is sent.

use reqwest::RequestBuilder;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::handlers::products::ApiResponse;
use crate::models::{
    AddPayment, ApproveUser, DeactivateUser, ForgotPassword, LoginRequest, LoginResponse, Manager,
    NewProduct, Product, ProductTree, SignupRequest, SignupResponse, User,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Admin call attempted before logging in
    #[error("Authorization token missing")]
    MissingToken,

    #[error("{message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl AdminClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(request.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Request failed")
            .to_string();
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        Self::send(self.http.post(self.url(path)).json(body)).await
    }

    async fn admin_get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(self.http.get(self.url(path)))?;
        Self::send(request).await
    }

    async fn admin_post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorized(self.http.post(self.url(path)).json(body))?;
        Self::send(request).await
    }

    // ============ Public ============

    /// Log in and keep the returned token for later admin calls.
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<()> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("/auth/login", &body).await?;
        self.token = Some(response.token);
        Ok(())
    }

    pub async fn signup(&self, request: &SignupRequest) -> ClientResult<SignupResponse> {
        self.post("/auth/signup", request).await
    }

    pub async fn forgot_password(&self, email: &str, new_password: &str) -> ClientResult<()> {
        let body = ForgotPassword {
            email: email.to_string(),
            new_password: new_password.to_string(),
        };
        let _: serde_json::Value = self.post("/auth/forgot-password", &body).await?;
        Ok(())
    }

    pub async fn create_product(&self, product: &NewProduct) -> ClientResult<ProductTree> {
        let response: ApiResponse<ProductTree> = self.post("/product", product).await?;
        Ok(response.data)
    }

    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        Self::send(self.http.get(self.url("/product"))).await
    }

    // ============ Super-admin ============

    pub async fn list_managers(&self) -> ClientResult<Vec<Manager>> {
        self.admin_get("/admin/managers").await
    }

    pub async fn add_payment(&self, payment: &AddPayment) -> ClientResult<Manager> {
        self.admin_post("/admin/add_payment", payment).await
    }

    pub async fn login_requests(&self) -> ClientResult<Vec<User>> {
        self.admin_get("/admin/login_requests").await
    }

    /// Approve (`true`) or reject (`false`) a pending account.
    pub async fn approve_user(&self, id: i64, approve: bool) -> ClientResult<User> {
        let body = ApproveUser {
            id,
            check: approve.then_some(true),
        };
        self.admin_post("/admin/approve_user", &body).await
    }

    pub async fn active_users(&self) -> ClientResult<Vec<User>> {
        self.admin_get("/admin/active_users").await
    }

    pub async fn deactivate_user(&self, id: i64) -> ClientResult<User> {
        self.admin_post("/admin/deactivate_user", &DeactivateUser { id })
            .await
    }
}
