//! Tasklist CLI - operator commands for database migrations and bootstrap.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tasklist_cli::cli::{Cli, Command};
use tasklist_cli::commands;
use tasklist_cli::error::CliResult;
use tasklist_cli::output;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        output::newline();
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Migrate(args) => commands::migrate::run(args).await,
        Command::Status(args) => commands::status::run(args).await,
        Command::Setup(args) => commands::setup::run(args).await,
    }
}
