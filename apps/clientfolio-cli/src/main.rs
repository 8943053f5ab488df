//! clientfolio - track business clients by folder
//!
//! Terminal front end over `clientfolio-core`. State lives in one JSON
//! snapshot per storage key under the data directory.

mod commands;
mod error;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clientfolio_core::{ClientfolioConfig, FileBackend, FolderStore};
use tracing_subscriber::EnvFilter;

use commands::{Command, StdinConfirm};
use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "clientfolio")]
#[command(about = "Track active and potential business clients in folders")]
#[command(version)]
struct Cli {
    /// Config file (.toml or .json)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the saved snapshot (overrides the config file)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log store activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(cli.config.as_deref(), cli.data_dir)?;
    let mut store = FolderStore::new(
        FileBackend::new(config.data_dir()),
        config.storage.key.clone(),
    );
    let events = store.subscribe();
    store.load();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = commands::execute(cli.command, &mut store, &config, &mut out, &mut StdinConfirm);

    for event in events.try_iter() {
        writeln!(out, "{}", event.message())?;
    }
    result
}

/// Config file (or defaults) with the command-line data directory applied.
fn resolve_config(
    path: Option<&std::path::Path>,
    data_dir: Option<PathBuf>,
) -> Result<ClientfolioConfig, CliError> {
    let mut config = match path {
        Some(path) => ClientfolioConfig::load(path)?,
        None => ClientfolioConfig::new(),
    };
    if let Some(dir) = data_dir {
        config.storage.data_dir = Some(dir);
    }
    tracing::debug!(data_dir = %config.data_dir().display(), key = %config.storage.key, "resolved config");
    Ok(config)
}
