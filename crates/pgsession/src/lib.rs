//! # pgsession
//!
//! Blocking PostgreSQL and Redshift sessions for [`converge`].
//!
//! A [`PgSession`] owns one `sqlx` connection and a private current-thread
//! runtime, so callers get plain synchronous calls:
//!
//! ```no_run
//! use converge::{DesiredState, reconcile};
//! use pgsession::{ConnectOptions, SslMode, connect};
//!
//! # fn main() -> Result<(), converge::Error> {
//! let opts = ConnectOptions::new("postgres")
//!     .host("localhost")
//!     .user("postgres")
//!     .ssl_mode(SslMode::Disable);
//!
//! let mut session = connect(&opts)?;
//! let result = reconcile(DesiredState::Present, "acme", false, &mut session);
//! let _ = session.close();
//! let outcome = result?;
//! println!("changed: {}", outcome.changed);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod options;
pub mod session;

pub use error::ConnectError;
pub use options::{ConnectOptions, DEFAULT_MAINTENANCE_DB, SslMode};
pub use session::{PgSession, connect};
