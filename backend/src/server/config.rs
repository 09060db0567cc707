//! Application settings and the HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::Key;
use herdbook::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PHOTO_DIR: &str = "images";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_LOGIN_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_LOGIN_WINDOW_SECS: u64 = 15 * 60;

/// Settings loaded from CLI flags, `HERDBOOK_*` environment variables, and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HERDBOOK")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound for pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection before failing.
    pub db_connection_timeout_secs: Option<u64>,
    /// Directory holding uploaded animal photos.
    pub photo_dir: Option<PathBuf>,
    /// File containing the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Permit a random session key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
    /// Mark session cookies `Secure`.
    pub session_cookie_secure: Option<bool>,
    /// Login attempts allowed per client within the window.
    pub login_max_attempts: Option<u32>,
    /// Length of the login throttle window in seconds.
    pub login_window_secs: Option<u64>,
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns the parse error when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn db_connection_timeout(&self) -> Duration {
        Duration::from_secs(
            self.db_connection_timeout_secs
                .unwrap_or(DEFAULT_DB_CONNECTION_TIMEOUT_SECS),
        )
    }

    pub fn photo_dir(&self) -> PathBuf {
        self.photo_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PHOTO_DIR))
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Ephemeral keys are refused unless explicitly enabled.
    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    /// Cookies are `Secure` unless explicitly disabled.
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure.unwrap_or(true)
    }

    pub fn login_max_attempts(&self) -> u32 {
        self.login_max_attempts
            .unwrap_or(DEFAULT_LOGIN_MAX_ATTEMPTS)
    }

    pub fn login_window_secs(&self) -> u64 {
        self.login_window_secs
            .unwrap_or(DEFAULT_LOGIN_WINDOW_SECS)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) photo_dir: PathBuf,
    pub(crate) login_max_attempts: u32,
    pub(crate) login_window_secs: u64,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from the session key and listen
    /// address, with default photo directory and login throttle.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
            photo_dir: PathBuf::from(DEFAULT_PHOTO_DIR),
            login_max_attempts: DEFAULT_LOGIN_MAX_ATTEMPTS,
            login_window_secs: DEFAULT_LOGIN_WINDOW_SECS,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Store photos under `dir`.
    #[must_use]
    pub fn with_photo_dir(mut self, dir: PathBuf) -> Self {
        self.photo_dir = dir;
        self
    }

    /// Allow `max_attempts` logins per client within `window_secs`.
    #[must_use]
    pub fn with_login_throttle(mut self, max_attempts: u32, window_secs: u64) -> Self {
        self.login_max_attempts = max_attempts;
        self.login_window_secs = window_secs;
        self
    }

    /// Attach a database connection pool. Without one, records are kept in
    /// memory for the life of the process.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
