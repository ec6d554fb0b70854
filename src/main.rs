//! Satchel - request-scoped session store
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use satchel::cli::{commands, Cli, Commands, Invocation};
use satchel::config::ConfigManager;
use satchel::error::SatchelResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            if e.is_caller_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run() -> SatchelResult<()> {
    let cli = Cli::parse();

    let mut manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    if let Some(ref dir) = cli.state_dir {
        manager = manager.with_state_dir(dir.clone());
    }

    let config = manager.load().await?;

    // 0 = warn, 1 = info, 2+ = debug; general.verbose raises the floor to info
    let level = match (cli.verbose, config.general.verbose) {
        (0, false) => "satchel=warn",
        (0, true) | (1, _) => "satchel=info",
        _ => "satchel=debug",
    };
    init_tracing(EnvFilter::new(level), &config.general.log_format);

    debug!("Using config {}", manager.path().display());
    manager.ensure_state_dirs().await?;

    let inv = Invocation::new(config, manager, cli.session);

    match cli.command {
        Commands::Open => commands::open(&inv).await,
        Commands::Write(args) => commands::write(args, &inv).await,
        Commands::Read(args) => commands::read(args, &inv).await,
        Commands::Destroy(args) => commands::destroy(args, &inv).await,
        Commands::Clear(args) => commands::clear(args, &inv).await,
        Commands::Close => commands::close(&inv).await,
        Commands::Gc(args) => commands::gc(args, &inv).await,
        Commands::Status => commands::status(&inv).await,
        Commands::Dump(args) => commands::dump(args, &inv).await,
        Commands::List(args) => commands::list(args, &inv).await,
        Commands::Config(args) => commands::config(args, &inv).await,
    }
}

fn init_tracing(filter: EnvFilter, format: &str) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
