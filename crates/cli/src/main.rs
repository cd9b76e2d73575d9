mod cli;
mod commands;
mod terminal;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use reportlens_core::config::{load_dotenv, Config};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{CliArgs, Command};
use terminal::Terminal;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    let command = args.command();

    // Setup narrates its progress through logs; the interactive commands stay quiet.
    let default_filter = match command {
        Command::Setup { .. } => "info",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let terminal = Terminal::new();
    match run(&args, command, &terminal).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            terminal.print_error(&format!("{e:#}")).ok();
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &CliArgs, command: Command, terminal: &Terminal) -> Result<()> {
    load_dotenv();
    let mut config = Config::from_env();
    args.apply(&mut config);
    config.log_summary();
    debug!(?command, "Dispatching");

    match command {
        Command::Setup { yes } => commands::setup::run(&config, terminal, yes).await,
        Command::Chat => commands::chat::run(&config, terminal).await,
        Command::TestQueries { mode } => commands::test_queries::run(&config, terminal, mode).await,
    }
}
