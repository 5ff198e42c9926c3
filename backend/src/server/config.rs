//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use ledger::outbound::persistence::DbPool;
use ledger::settings::LedgerSettings;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) lock_timeout: Duration,
    pub(crate) request_timeout: Duration,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Bind on every interface at the configured port.
    #[must_use]
    pub fn from_settings(settings: &LedgerSettings) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], settings.port)),
            db_pool: None,
            lock_timeout: settings.lock_timeout,
            request_timeout: settings.request_timeout,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool so PostgreSQL adapters replace the
    /// in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
