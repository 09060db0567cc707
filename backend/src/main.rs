//! Herd book server entry-point: loads settings, prepares the record store,
//! and serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context as _, Result};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use herdbook::inbound::http::health::HealthState;
use herdbook::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, BuildMode, ServerConfig, create_server, load_session_key};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load configuration")?;
    let key = load_session_key(
        &settings.session_key_file(),
        BuildMode::from_debug_assertions(),
        settings.session_allow_ephemeral(),
    )?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("invalid bind address")?;

    let mut config = ServerConfig::new(key, settings.session_cookie_secure(), bind_addr)
        .with_photo_dir(settings.photo_dir())
        .with_login_throttle(settings.login_max_attempts(), settings.login_window_secs());

    if let Some(url) = settings.database_url() {
        run_pending_migrations(url)
            .await
            .wrap_err("failed to apply database migrations")?;
        let pool = DbPool::new(
            PoolConfig::new(url)
                .with_max_size(settings.db_max_connections())
                .with_connection_timeout(settings.db_connection_timeout()),
        )
        .await
        .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(server::build_metrics()?));
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting herd book server");
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}
