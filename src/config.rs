//! Config file support
//!
//! An optional `config.toml` supplies connection defaults:
//!
//! ```toml
//! [connection]
//! login_host = "warehouse.example.com"
//! port = 5439
//! login_user = "admin"
//! maintenance_db = "dev"
//! ssl_mode = "verify-full"
//! ssl_rootcert = "~/.postgresql/root.crt"
//! ```
//!
//! Command-line flags and `PG*` environment variables take precedence.

use anyhow::{Context, Result};
use pgsession::{ConnectOptions, DEFAULT_MAINTENANCE_DB, SslMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::paths;

/// User that sessions log in as when none is configured
pub const DEFAULT_LOGIN_USER: &str = "postgres";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// Connection settings, every field optional so layers can be merged
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub maintenance_db: Option<String>,
    pub login_host: Option<String>,
    pub login_unix_socket: Option<String>,
    pub port: Option<u16>,
    pub login_user: Option<String>,
    pub login_password: Option<String>,
    pub ssl_mode: Option<SslMode>,
    pub ssl_rootcert: Option<String>,
}

impl Config {
    /// Load from `explicit`, or from the default location if it exists.
    ///
    /// An explicitly named file must exist; a missing default file yields
    /// an empty config.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let path = paths::config_file()?;
        if !path.exists() {
            log::debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Empty strings count as unset
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ConnectionConfig {
    /// Keep every field that is set here, take the rest from `fallback`
    pub fn or(self, fallback: ConnectionConfig) -> Self {
        Self {
            maintenance_db: non_empty(self.maintenance_db).or(non_empty(fallback.maintenance_db)),
            login_host: non_empty(self.login_host).or(non_empty(fallback.login_host)),
            login_unix_socket: non_empty(self.login_unix_socket)
                .or(non_empty(fallback.login_unix_socket)),
            port: self.port.or(fallback.port),
            login_user: non_empty(self.login_user).or(non_empty(fallback.login_user)),
            login_password: non_empty(self.login_password).or(non_empty(fallback.login_password)),
            ssl_mode: self.ssl_mode.or(fallback.ssl_mode),
            ssl_rootcert: non_empty(self.ssl_rootcert).or(non_empty(fallback.ssl_rootcert)),
        }
    }

    /// Resolve to session options, applying built-in defaults
    pub fn into_connect_options(self) -> ConnectOptions {
        let database = non_empty(self.maintenance_db)
            .unwrap_or_else(|| DEFAULT_MAINTENANCE_DB.to_string());
        let user = non_empty(self.login_user).unwrap_or_else(|| DEFAULT_LOGIN_USER.to_string());

        let mut opts = ConnectOptions::new(database)
            .user(user)
            .ssl_mode(self.ssl_mode.unwrap_or_default());
        opts.host = non_empty(self.login_host);
        opts.port = self.port;
        opts.socket = non_empty(self.login_unix_socket).map(|s| paths::expand(&s));
        opts.password = non_empty(self.login_password);
        opts.ssl_root_cert = non_empty(self.ssl_rootcert).map(|s| paths::expand(&s));
        opts.application_name = Some(env!("CARGO_PKG_NAME").to_string());
        opts
    }
}
