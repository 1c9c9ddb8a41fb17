//! Blocking session over a single sqlx connection

use crate::error::{ConnectError, session_error};
use crate::options::ConnectOptions;
use converge::{Row, Session, SessionError};
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Connection, Row as _};
use tokio::runtime::{Builder, Runtime};

/// One connection to the maintenance database, driven on a private
/// current-thread runtime so every call blocks until the server answers.
pub struct PgSession {
    runtime: Runtime,
    conn: PgConnection,
    autocommit: bool,
    target: String,
}

impl std::fmt::Debug for PgSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgSession")
            .field("target", &self.target)
            .field("autocommit", &self.autocommit)
            .finish_non_exhaustive()
    }
}

/// Open a session to `opts.database`.
///
/// The database being managed cannot be the target: it may not exist yet.
pub fn connect(opts: &ConnectOptions) -> Result<PgSession, ConnectError> {
    if let Some(cert) = &opts.ssl_root_cert
        && !cert.is_file()
    {
        return Err(ConnectError::RootCertNotFound(cert.clone()));
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ConnectError::Runtime)?;

    let target = opts.target();
    log::debug!(
        "Connecting to {} (sslmode={}, autocommit={})",
        target,
        opts.ssl_mode,
        opts.autocommit
    );

    let pg_opts = opts.to_pg_options();
    let conn = runtime.block_on(PgConnection::connect_with(&pg_opts))?;
    log::debug!("Connected to {target}");

    Ok(PgSession {
        runtime,
        conn,
        autocommit: opts.autocommit,
        target,
    })
}

impl PgSession {
    /// Where this session is connected, without credentials
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Close the connection gracefully.
    ///
    /// Dropping the session also releases the socket, without the
    /// terminate handshake.
    pub fn close(self) -> Result<(), SessionError> {
        let Self {
            runtime,
            conn,
            target,
            ..
        } = self;
        log::debug!("Closing session to {target}");
        runtime.block_on(conn.close()).map_err(session_error)
    }
}

fn text_row(row: &PgRow) -> Result<Row, SessionError> {
    let columns = (0..row.len())
        .map(|i| row.try_get::<Option<String>, _>(i))
        .collect::<Result<Vec<_>, _>>()
        .map_err(session_error)?;
    Ok(Row::new(columns))
}

impl Session for PgSession {
    fn autocommit(&self) -> bool {
        self.autocommit
    }

    fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Row>, SessionError> {
        log::trace!("query: {sql} {params:?}");

        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(*param);
        }

        let rows = self
            .runtime
            .block_on(query.fetch_all(&mut self.conn))
            .map_err(session_error)?;
        log::trace!("query returned {} row(s)", rows.len());

        rows.iter().map(text_row).collect()
    }

    fn execute(&mut self, sql: &str) -> Result<u64, SessionError> {
        log::trace!("execute: {sql}");

        let conn = &mut self.conn;
        let affected = if self.autocommit {
            self.runtime
                .block_on(sqlx::raw_sql(sql).execute(conn))
                .map(|done| done.rows_affected())
        } else {
            self.runtime.block_on(async move {
                let mut tx = conn.begin().await?;
                let done = sqlx::raw_sql(sql).execute(&mut *tx).await?;
                tx.commit().await?;
                Ok::<_, sqlx::Error>(done.rows_affected())
            })
        }
        .map_err(session_error)?;

        log::trace!("execute affected {affected} row(s)");
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use converge::{DesiredState, ErrorKind, reconcile};

    #[test]
    fn test_missing_root_cert_fails_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("root.crt");
        let opts = ConnectOptions::new("postgres")
            .host("127.0.0.1")
            .port(1)
            .ssl_root_cert(&missing);

        let err = connect(&opts).unwrap_err();
        assert!(matches!(err, ConnectError::RootCertNotFound(ref p) if *p == missing));
        let err: converge::Error = err.into();
        assert_eq!(err.kind(), ErrorKind::Connection);
    }

    #[test]
    fn test_unreachable_server_is_connect_error() {
        let opts = ConnectOptions::new("postgres")
            .host("127.0.0.1")
            .port(1)
            .user("nobody")
            .password("x")
            .ssl_mode(crate::SslMode::Disable);

        let err = connect(&opts).unwrap_err();
        assert!(matches!(err, ConnectError::Driver(_)));
    }

    /// Needs a reachable server with `CREATEDB`:
    /// `DBCONVERGE_TEST_HOST=localhost DBCONVERGE_TEST_USER=postgres cargo test -- --ignored`
    #[test]
    #[ignore = "requires a running PostgreSQL server"]
    fn test_live_round_trip() {
        let host = std::env::var("DBCONVERGE_TEST_HOST").unwrap();
        let mut opts = ConnectOptions::new("postgres").host(host);
        if let Ok(user) = std::env::var("DBCONVERGE_TEST_USER") {
            opts = opts.user(user);
        }
        if let Ok(password) = std::env::var("DBCONVERGE_TEST_PASSWORD") {
            opts = opts.password(password);
        }

        let mut session = connect(&opts).unwrap();
        let name = "Converge Test \"db\"";

        let created = reconcile(DesiredState::Present, name, false, &mut session).unwrap();
        let again = reconcile(DesiredState::Present, name, false, &mut session).unwrap();
        let check = reconcile(DesiredState::Absent, name, true, &mut session).unwrap();
        let dropped = reconcile(DesiredState::Absent, name, false, &mut session).unwrap();
        let gone = reconcile(DesiredState::Absent, name, false, &mut session).unwrap();

        assert!(created.changed);
        assert!(!again.changed);
        assert!(check.changed);
        assert!(dropped.changed);
        assert!(!gone.changed);
        session.close().unwrap();
    }
}
