//! Command implementations

pub mod apply;
pub mod status;

use anyhow::Result;
use pgsession::{ConnectOptions, PgSession};

use crate::ui;

/// Open the one session an invocation uses
pub(crate) fn open_session(opts: &ConnectOptions) -> Result<PgSession> {
    let session = pgsession::connect(opts).map_err(converge::Error::from)?;
    Ok(session)
}

/// Release the session; a failed goodbye does not change the result
pub(crate) fn close_session(session: PgSession) {
    if let Err(e) = session.close() {
        log::warn!("Failed to close session cleanly: {e}");
    }
}

/// Render a failure as text on stderr, or as a JSON document on stdout
pub fn report_error(err: &anyhow::Error, json: bool) {
    let reconcile_err = err.downcast_ref::<converge::Error>();
    let msg = match reconcile_err {
        Some(e) => e.to_string(),
        None => format!("{err:#}"),
    };

    if json {
        let doc = serde_json::json!({
            "failed": true,
            "msg": msg,
            "kind": reconcile_err.map(|e| e.kind().as_str()),
        });
        println!("{doc}");
    } else {
        ui::error(&msg);
    }
}
