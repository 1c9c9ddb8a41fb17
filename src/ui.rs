use colored::Colorize;
use converge::{Action, DesiredState, Outcome};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an unchanged/no-op message
pub fn unchanged(msg: &str) {
    println!("{} {}", "○".dimmed(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// One-line description of an outcome, without decoration
pub fn describe(outcome: &Outcome, desired: DesiredState) -> String {
    let name = outcome.name.as_str();
    match (outcome.action, outcome.dry_run) {
        (Action::Create, false) => format!("database \"{name}\" created"),
        (Action::Drop, false) => format!("database \"{name}\" dropped"),
        (Action::Create, true) => format!("would create database \"{name}\""),
        (Action::Drop, true) => format!("would drop database \"{name}\""),
        (Action::None, _) => format!("database \"{name}\" already {desired}"),
    }
}

/// Print an outcome with the symbol matching what happened
pub fn outcome(outcome: &Outcome, desired: DesiredState) {
    let line = describe(outcome, desired);
    match (outcome.changed, outcome.dry_run) {
        (true, false) => success(&line),
        (true, true) => info(&line),
        (false, true) => unchanged(&format!("{line} {}", "(check mode)".dimmed())),
        (false, false) => unchanged(&line),
    }
}
