use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use converge::DesiredState;
use pgsession::SslMode;
use std::path::PathBuf;

use crate::config::ConnectionConfig;

#[derive(Parser)]
#[command(name = "dbconverge")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Ensure a PostgreSQL or Redshift database is present or absent", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ~/.config/dbconverge/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create or drop a database so it matches the desired state
    Apply(ApplyArgs),

    /// Show whether a database exists
    Status(StatusArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Command {
    /// Whether results (and failures) should be printed as JSON
    pub fn json(&self) -> bool {
        match self {
            Command::Apply(args) => args.json,
            Command::Status(args) => args.json,
            Command::Completions { .. } => false,
        }
    }
}

// ============================================================================
// Apply / Status
// ============================================================================

#[derive(Args)]
pub struct ApplyArgs {
    /// Name of the database to add or remove
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Desired state of the database
    #[arg(short, long, value_enum, default_value_t = StateArg::Present)]
    pub state: StateArg,

    /// Report what would change without changing anything
    #[arg(long, visible_alias = "dry-run")]
    pub check: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Name of the database to look up
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    Present,
    Absent,
}

impl From<StateArg> for DesiredState {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Present => DesiredState::Present,
            StateArg::Absent => DesiredState::Absent,
        }
    }
}

// ============================================================================
// Connection
// ============================================================================

#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Database to connect to for issuing CREATE/DROP [default: postgres]
    #[arg(long, value_name = "NAME", help_heading = "Connection")]
    pub maintenance_db: Option<String>,

    /// Host to connect to
    #[arg(long, env = "PGHOST", value_name = "HOST", help_heading = "Connection")]
    pub login_host: Option<String>,

    /// Directory holding the server's unix socket
    #[arg(long, value_name = "DIR", help_heading = "Connection")]
    pub login_unix_socket: Option<String>,

    /// Port to connect to [default: 5432]
    #[arg(long, env = "PGPORT", help_heading = "Connection")]
    pub port: Option<u16>,

    /// User to log in as [default: postgres]
    #[arg(long, env = "PGUSER", value_name = "USER", help_heading = "Connection")]
    pub login_user: Option<String>,

    /// Password to log in with
    #[arg(
        long,
        env = "PGPASSWORD",
        hide_env_values = true,
        value_name = "PASSWORD",
        help_heading = "Connection"
    )]
    pub login_password: Option<String>,

    /// TLS mode [default: prefer]
    #[arg(long, env = "PGSSLMODE", value_enum, help_heading = "Connection")]
    pub ssl_mode: Option<SslModeArg>,

    /// CA certificate used to verify the server
    #[arg(long, env = "PGSSLROOTCERT", value_name = "PATH", help_heading = "Connection")]
    pub ssl_rootcert: Option<String>,
}

impl ConnectionArgs {
    /// Flag/environment layer of the connection settings
    pub fn to_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            maintenance_db: self.maintenance_db.clone(),
            login_host: self.login_host.clone(),
            login_unix_socket: self.login_unix_socket.clone(),
            port: self.port,
            login_user: self.login_user.clone(),
            login_password: self.login_password.clone(),
            ssl_mode: self.ssl_mode.map(Into::into),
            ssl_rootcert: self.ssl_rootcert.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SslModeArg {
    Disable,
    Allow,
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl From<SslModeArg> for SslMode {
    fn from(arg: SslModeArg) -> Self {
        match arg {
            SslModeArg::Disable => SslMode::Disable,
            SslModeArg::Allow => SslMode::Allow,
            SslModeArg::Prefer => SslMode::Prefer,
            SslModeArg::Require => SslMode::Require,
            SslModeArg::VerifyCa => SslMode::VerifyCa,
            SslModeArg::VerifyFull => SslMode::VerifyFull,
        }
    }
}
