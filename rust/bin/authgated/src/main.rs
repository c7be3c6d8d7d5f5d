//! `authgated` — the authentication server binary.
//!
//! Usage:
//!   authgated -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/authgate/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use authgate_core::Module;
use config::ServerConfig;

/// Authentication server.
#[derive(Parser, Debug)]
#[command(name = "authgated", about = "Session authentication server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides the configured value).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    server_config.verify()?;

    let listen = cli.listen.unwrap_or_else(|| server_config.listen.clone());

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = authgate_core::ServiceConfig {
        data_dir: Some(data_dir),
        listen: listen.clone(),
        ..Default::default()
    };

    let users: Arc<dyn authgate_users::UserStore> = Arc::new(
        authgate_users::SqliteUserStore::open(&core_config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open user store: {}", e))?,
    );
    let sessions: Arc<dyn authgate_sessions::SessionStore> = Arc::new(
        authgate_sessions::RedbSessionStore::open(&core_config.resolve_cache_path())
            .map_err(|e| anyhow::anyhow!("failed to open session store: {}", e))?,
    );

    // Initialize the auth module.
    let auth_module = auth::AuthModule::new(users, sessions, server_config.to_auth_config()?);
    info!(
        "Auth module initialized ({} OAuth provider(s))",
        server_config.providers.len()
    );

    let module_routes = vec![(auth_module.name(), auth_module.routes())];

    // Build router.
    let cors = routes::cors_layer(&server_config.client_origin)?;
    let app = routes::build_router(module_routes, cors);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("authgated listening on {}", listen);
    axum::serve(listener, app).await?;

    Ok(())
}
