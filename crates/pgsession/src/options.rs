//! Connection options

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Database a session connects to when none is given
pub const DEFAULT_MAINTENANCE_DB: &str = "postgres";

/// TLS negotiation mode, named as libpq names them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    Disable,
    Allow,
    #[default]
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Allow => "allow",
            Self::Prefer => "prefer",
            Self::Require => "require",
            Self::VerifyCa => "verify-ca",
            Self::VerifyFull => "verify-full",
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(Self::Disable),
            "allow" => Ok(Self::Allow),
            "prefer" => Ok(Self::Prefer),
            "require" => Ok(Self::Require),
            "verify-ca" | "verify_ca" => Ok(Self::VerifyCa),
            "verify-full" | "verify_full" => Ok(Self::VerifyFull),
            other => Err(format!(
                "invalid ssl mode '{other}', expected one of: disable, allow, prefer, require, verify-ca, verify-full"
            )),
        }
    }
}

impl From<SslMode> for PgSslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Allow => PgSslMode::Allow,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
            SslMode::VerifyCa => PgSslMode::VerifyCa,
            SslMode::VerifyFull => PgSslMode::VerifyFull,
        }
    }
}

/// How to reach the maintenance database
///
/// Unset fields fall back to the driver's defaults, which honor the usual
/// `PG*` environment variables and `~/.pgpass`.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Bootstrap database; never the database being managed
    pub database: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Directory containing the server's unix socket
    pub socket: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub ssl_mode: SslMode,
    pub ssl_root_cert: Option<PathBuf>,
    /// Commit each statement on its own; required for database DDL
    pub autocommit: bool,
    pub application_name: Option<String>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            database: DEFAULT_MAINTENANCE_DB.to_string(),
            host: None,
            port: None,
            socket: None,
            user: None,
            password: None,
            ssl_mode: SslMode::default(),
            ssl_root_cert: None,
            autocommit: true,
            application_name: None,
        }
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("socket", &self.socket)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("ssl_mode", &self.ssl_mode)
            .field("ssl_root_cert", &self.ssl_root_cert)
            .field("autocommit", &self.autocommit)
            .field("application_name", &self.application_name)
            .finish()
    }
}

impl ConnectOptions {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn ssl_mode(mut self, mode: SslMode) -> Self {
        self.ssl_mode = mode;
        self
    }

    pub fn ssl_root_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ssl_root_cert = Some(path.into());
        self
    }

    pub fn autocommit(mut self, autocommit: bool) -> Self {
        self.autocommit = autocommit;
        self
    }

    /// Where the session goes, for log lines (no credentials)
    pub fn target(&self) -> String {
        let host = match (&self.host, &self.socket) {
            (Some(host), _) => host.clone(),
            (None, Some(socket)) => socket.display().to_string(),
            (None, None) => "localhost".to_string(),
        };
        match self.port {
            Some(port) => format!("{host}:{port}/{}", self.database),
            None => format!("{host}/{}", self.database),
        }
    }

    /// Driver options for these settings
    pub fn to_pg_options(&self) -> PgConnectOptions {
        let mut opts = PgConnectOptions::new()
            .database(&self.database)
            .ssl_mode(self.ssl_mode.into());

        if let Some(host) = &self.host {
            opts = opts.host(host);
        }
        if let Some(port) = self.port {
            opts = opts.port(port);
        }
        if let Some(socket) = &self.socket {
            opts = opts.socket(socket);
        }
        if let Some(user) = &self.user {
            opts = opts.username(user);
        }
        if let Some(password) = &self.password {
            opts = opts.password(password);
        }
        if let Some(cert) = &self.ssl_root_cert {
            opts = opts.ssl_root_cert(cert);
        }
        if let Some(name) = &self.application_name {
            opts = opts.application_name(name);
        }
        opts
    }
}
