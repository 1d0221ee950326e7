mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use xuictl_api::Api;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let Cli { global, command } = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(global.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match command {
        Command::Config(args) => commands::config_cmd::handle(args, &global),
        Command::Completions(args) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "xuictl", &mut std::io::stdout());
            Ok(())
        }
        panel_cmd => run_against_panel(panel_cmd, &global).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = u8::try_from(err.exit_code()).unwrap_or(1);
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}

/// `RUST_LOG` wins; otherwise each `-v` raises the level one step from warn.
fn log_filter(verbosity: u8) -> EnvFilter {
    const LEVELS: [&str; 4] = ["warn", "info", "debug", "trace"];
    let level = LEVELS[usize::from(verbosity).min(LEVELS.len() - 1)];
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Resolve the connection, log in once, then hand off to the command.
async fn run_against_panel(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let api = Api::new(config::build_panel_config(global)?)?;
    api.login().await?;
    tracing::debug!(host = %api.session().host(), "logged in");
    commands::dispatch(cmd, &api, global).await
}
