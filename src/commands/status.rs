//! `dbconverge status`: report whether a database exists

use anyhow::Result;
use converge::{IdentifierKind, quote_identifier};

use crate::Context;
use crate::cli::StatusArgs;
use crate::ui;

pub fn run(ctx: &Context, args: StatusArgs) -> Result<()> {
    let identifier =
        quote_identifier(&args.name, IdentifierKind::Database).map_err(converge::Error::from)?;

    let opts = ctx.connect_options(&args.connection);
    let mut session = super::open_session(&opts)?;
    let target = session.target().to_string();

    let result = converge::observe(&mut session, &identifier);
    super::close_session(session);
    let observed = result?;

    if args.json {
        let doc = serde_json::json!({
            "db": args.name,
            "exists": observed.exists(),
        });
        println!("{doc}");
        return Ok(());
    }

    if observed.exists() {
        ui::success(&format!("database \"{}\" exists", args.name));
    } else {
        ui::unchanged(&format!("database \"{}\" does not exist", args.name));
    }
    if !ctx.quiet {
        ui::kv("server", &target);
        ui::kv("identifier", identifier.quoted());
    }
    Ok(())
}
