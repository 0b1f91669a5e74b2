use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use storefront_admin::config::Config;
use storefront_admin::db::{AppState, create_pool};
use storefront_admin::jwt::SessionKeys;

#[derive(Parser, Debug)]
#[command(name = "storefront-admin", version, about = "Storefront admin API server")]
struct Cli {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database file (overrides DATABASE_PATH)
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_admin=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().map_err(anyhow::Error::msg)?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    if config.dev_mode {
        tracing::warn!("running in dev mode");
    }

    let pool = create_pool(&config.database_path, 10)?;
    tracing::info!(path = %config.database_path, "database ready");

    if let (Some(email), Some(password)) = (
        config.bootstrap_superadmin_email.as_deref(),
        config.bootstrap_superadmin_password.as_deref(),
    ) {
        match storefront_admin::bootstrap_superadmin(&pool, email, password)? {
            Some(user) => tracing::info!(user_id = user.id, email = %user.email, "bootstrapped super-admin"),
            None => tracing::debug!(email, "super-admin already exists"),
        }
    }

    let state = AppState {
        db: pool,
        sessions: SessionKeys::new(config.jwt_secret.as_bytes(), config.token_ttl_hours),
    };

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, storefront_admin::app(state)).await?;

    Ok(())
}
