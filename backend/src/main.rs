//! Ledger entry-point: reads settings, prepares storage and serves HTTP.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ledger::inbound::http::health::HealthState;
use ledger::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ledger::settings::{DatabaseSettings, LedgerSettings};
use server::{ServerConfig, create_server};

async fn connect(database: &DatabaseSettings) -> std::io::Result<DbPool> {
    let url = database.url().map_err(std::io::Error::other)?;
    let applied = run_pending_migrations(url.clone())
        .await
        .map_err(std::io::Error::other)?;
    info!(applied, host = %database.host, "database migrations complete");
    DbPool::new(PoolConfig::new(url).with_max_size(database.pool_size))
        .await
        .map_err(std::io::Error::other)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = LedgerSettings::from_env(&DefaultEnv::new()).map_err(|err| {
        error!(error = %err, "invalid configuration");
        std::io::Error::other(err)
    })?;

    let config = ServerConfig::from_settings(&settings);
    let config = match &settings.database {
        Some(database) => config.with_db_pool(connect(database).await?),
        None => config,
    };
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::prometheus_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;

    let handle = server.handle();
    let draining = health_state.clone();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested; draining");
            draining.mark_unhealthy();
            handle.stop(true).await;
        }
    });

    server.await
}
