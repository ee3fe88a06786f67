//! daybook CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use daybook_client::cli::{Cli, Command, ConfigAction};
use daybook_client::commands;
use daybook_client::config::ClientConfig;
use daybook_client::error::ClientResult;
use daybook_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    }
    .with_overrides(&cli);

    init_tracing(tracing_config(&cli, &config))?;

    match cli.command {
        Command::List(ref args) => commands::list::run(args, &config).await,
        Command::Add(ref args) => commands::add::run(args, &config).await,
        Command::Edit(ref args) => commands::edit::run(args, &config).await,
        Command::Delete { ref id } => commands::delete::run(id, &config).await,
        Command::Expand(ref args) => commands::expand::run(args, &config),
        Command::Watch(ref args) => commands::watch::run(args, &config).await,
        Command::Config { ref action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Path => commands::config::path(&config),
        },
    }
}

fn tracing_config(cli: &Cli, config: &ClientConfig) -> TracingConfig {
    let base = match &cli.command {
        _ if config.debug => TracingConfig::cli_debug(),
        Command::Watch(args) if args.json_logs => TracingConfig::daemon(),
        Command::Watch(_) => TracingConfig::default(),
        _ => TracingConfig::cli(),
    };
    base.with_verbosity(cli.verbose)
}
