use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use service::auth::domain::ROLE_ADMIN;
use tracing::{error, info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn bind_addr(cfg: &configs::ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address {}:{}: {}", cfg.host, cfg.port, e)))
}

/// Create the configured admin account when it does not exist yet.
pub async fn bootstrap_admin(state: &ServerState, cfg: &configs::AuthConfig) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (&cfg.bootstrap_admin_email, &cfg.bootstrap_admin_password) else {
        return Ok(());
    };
    let (user, created) = state.auth.ensure_user(email, password, ROLE_ADMIN).await?;
    if created {
        info!(user_id = %user.id, email = %user.email, "bootstrap admin created");
    } else {
        info!(email = %user.email, "bootstrap admin already present");
    }
    Ok(())
}

/// Public entry: connect, migrate, build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    if cfg.auth.uses_dev_secret() {
        warn!("JWT_SECRET not set; using the development secret");
    }

    // The store connection is the one failure that stops the process.
    let db = models::db::connect_with_config(&cfg.database).await.map_err(|e| {
        error!(error = %e, "failed to connect to database");
        StartupError::Database(e.to_string())
    })?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    let state = ServerState::from_db(db, &cfg);
    bootstrap_admin(&state, &cfg.auth).await?;

    let cors = routes::build_cors(&cfg.cors)?;
    let app: Router = routes::build_router(state, cors);

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, "starting catalog server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
