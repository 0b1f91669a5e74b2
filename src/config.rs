use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub jwt_secret: String,
    pub token_ttl_hours: u64,
    /// Super-admin seeded at startup when both email and password are set
    pub bootstrap_superadmin_email: Option<String>,
    pub bootstrap_superadmin_password: Option<String>,
    pub dev_mode: bool,
}

/// Signing secret used in dev mode when JWT_SECRET is unset.
const DEV_JWT_SECRET: &str = "storefront-admin-dev-secret-do-not-use-in-production";

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("STOREFRONT_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if dev_mode => DEV_JWT_SECRET.to_string(),
            _ => return Err("JWT_SECRET must be set outside dev mode".to_string()),
        };

        let token_ttl_hours: u64 = env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|h| *h > 0)
            .unwrap_or(24);

        Ok(Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "storefront.db".to_string()),
            jwt_secret,
            token_ttl_hours,
            bootstrap_superadmin_email: env::var("BOOTSTRAP_SUPERADMIN_EMAIL").ok(),
            bootstrap_superadmin_password: env::var("BOOTSTRAP_SUPERADMIN_PASSWORD").ok(),
            dev_mode,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
