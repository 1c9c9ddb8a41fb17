mod cli;
mod commands;
mod config;
mod paths;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, ConnectionArgs};
use config::Config;
use pgsession::ConnectOptions;
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    pub config: Config,
}

impl Context {
    /// Flags and environment first, then the config file, then defaults
    pub fn connect_options(&self, args: &ConnectionArgs) -> ConnectOptions {
        args.to_config()
            .or(self.config.connection.clone())
            .into_connect_options()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let json = cli.command.json();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            commands::report_error(&err, json);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "dbconverge", &mut io::stdout());
        return Ok(());
    }

    let ctx = Context {
        quiet: cli.quiet,
        config: Config::load(cli.config.as_deref())?,
    };

    match cli.command {
        Command::Apply(args) => commands::apply::run(&ctx, args),
        Command::Status(args) => commands::status::run(&ctx, args),
        Command::Completions { .. } => Ok(()),
    }
}
