//! Environment-driven ledger configuration.
//!
//! Settings are read once at start-up through [`mockable::Env`] so tests can
//! supply variables without touching the process environment. Values that are
//! present but unparsable fail start-up instead of falling back to defaults.

use std::time::Duration;

use mockable::Env;
use tracing::warn;
use url::Url;

const PORT_ENV: &str = "BANKING_SERVICE_PORT";
const DB_HOST_ENV: &str = "BANKING_DB_HOST";
const DB_USERNAME_ENV: &str = "BANKING_DB_USERNAME";
const DB_PASSWORD_ENV: &str = "BANKING_DB_PASSWORD";
const DB_NAME_ENV: &str = "BANKING_DB_NAME";
const DB_PORT_ENV: &str = "BANKING_DB_PORT";
const DB_POOL_SIZE_ENV: &str = "BANKING_DB_POOL_SIZE";
const LOCK_TIMEOUT_ENV: &str = "BANKING_LOCK_TIMEOUT_MS";
const REQUEST_TIMEOUT_ENV: &str = "BANKING_REQUEST_TIMEOUT_MS";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_USERNAME: &str = "postgres";
const DEFAULT_DB_NAME: &str = "banking";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A variable is present but does not parse.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The database settings do not form a valid connection URL.
    #[error("cannot build database URL for host '{host}': {reason}")]
    DatabaseUrl { host: String, reason: String },
}

/// PostgreSQL connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
    pub pool_size: u32,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

impl DatabaseSettings {
    /// Connection URL with percent-encoded credentials.
    ///
    /// # Examples
    /// ```
    /// use ledger::settings::DatabaseSettings;
    ///
    /// let db = DatabaseSettings {
    ///     host: "db".into(),
    ///     port: 5432,
    ///     username: "app".into(),
    ///     password: "p@ss word".into(),
    ///     name: "banking".into(),
    ///     pool_size: 10,
    /// };
    /// assert_eq!(
    ///     db.url().expect("valid url"),
    ///     "postgres://app:p%40ss%20word@db:5432/banking"
    /// );
    /// ```
    pub fn url(&self) -> Result<String, SettingsError> {
        let fail = |reason: String| SettingsError::DatabaseUrl {
            host: self.host.clone(),
            reason,
        };
        let mut url = Url::parse(&format!("postgres://{}:{}", self.host, self.port))
            .map_err(|err| fail(err.to_string()))?;
        url.set_username(&self.username)
            .map_err(|()| fail("username not accepted".to_owned()))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|()| fail("password not accepted".to_owned()))?;
        }
        url.set_path(&self.name);
        Ok(url.into())
    }
}

/// All settings the ledger reads at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSettings {
    /// Port the HTTP server listens on.
    pub port: u16,
    /// PostgreSQL settings; `None` selects the in-memory store.
    pub database: Option<DatabaseSettings>,
    /// Longest wait for a row lock.
    pub lock_timeout: Duration,
    /// Deadline for a single balance mutation.
    pub request_timeout: Duration,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database: None,
            lock_timeout: Duration::from_millis(DEFAULT_LOCK_TIMEOUT_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl LedgerSettings {
    /// Read settings from the environment.
    ///
    /// # Examples
    /// ```
    /// use ledger::settings::LedgerSettings;
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| match name {
    ///     "BANKING_SERVICE_PORT" => Some("9000".to_owned()),
    ///     _ => None,
    /// });
    /// let settings = LedgerSettings::from_env(&env).expect("valid settings");
    /// assert_eq!(settings.port, 9000);
    /// assert!(settings.database.is_none());
    /// ```
    pub fn from_env<E: Env>(env: &E) -> Result<Self, SettingsError> {
        let port = parse_or(env, PORT_ENV, DEFAULT_PORT, "a port number")?;
        let lock_timeout = millis_or(env, LOCK_TIMEOUT_ENV, DEFAULT_LOCK_TIMEOUT_MS)?;
        let request_timeout = millis_or(env, REQUEST_TIMEOUT_ENV, DEFAULT_REQUEST_TIMEOUT_MS)?;
        let database = database_from_env(env)?;
        if database.is_none() {
            warn!("{DB_HOST_ENV} not set; using the in-memory store");
        }
        Ok(Self {
            port,
            database,
            lock_timeout,
            request_timeout,
        })
    }
}

fn non_empty<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}

fn parse_or<E: Env, T: std::str::FromStr>(
    env: &E,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, SettingsError> {
    match non_empty(env, name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidEnv {
                name,
                value: raw,
                expected,
            }),
        None => Ok(default),
    }
}

fn millis_or<E: Env>(env: &E, name: &'static str, default: u64) -> Result<Duration, SettingsError> {
    let millis = parse_or(env, name, default, "a positive number of milliseconds")?;
    if millis == 0 {
        return Err(SettingsError::InvalidEnv {
            name,
            value: millis.to_string(),
            expected: "a positive number of milliseconds",
        });
    }
    Ok(Duration::from_millis(millis))
}

fn database_from_env<E: Env>(env: &E) -> Result<Option<DatabaseSettings>, SettingsError> {
    let Some(host) = non_empty(env, DB_HOST_ENV) else {
        return Ok(None);
    };
    let pool_size = parse_or(env, DB_POOL_SIZE_ENV, DEFAULT_POOL_SIZE, "a positive integer")?;
    if pool_size == 0 {
        return Err(SettingsError::InvalidEnv {
            name: DB_POOL_SIZE_ENV,
            value: pool_size.to_string(),
            expected: "a positive integer",
        });
    }
    Ok(Some(DatabaseSettings {
        host: host.trim().to_owned(),
        port: parse_or(env, DB_PORT_ENV, DEFAULT_DB_PORT, "a port number")?,
        username: non_empty(env, DB_USERNAME_ENV).unwrap_or_else(|| DEFAULT_DB_USERNAME.to_owned()),
        password: env.string(DB_PASSWORD_ENV).unwrap_or_default(),
        name: non_empty(env, DB_NAME_ENV).unwrap_or_else(|| DEFAULT_DB_NAME.to_owned()),
        pool_size,
    }))
}

#[cfg(test)]
mod tests;
