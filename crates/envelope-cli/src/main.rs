//! `envelope-cli` — command-line entry point.
//!
//! Startup sequence:
//! 1. Parse the command line; `--help`, `--version` and usage errors exit here.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured JSON logging on stderr, tagged with the command.
//! 4. Decode the key if the command needs one, then run it against the
//!    token store.

mod command;
mod config;
mod key;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use kv_store::JsonFileStore;
use tracing::info;

use command::Cli;
use config::Config;
use key::KeyMaterial;

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Command
    // -----------------------------------------------------------------------
    let Cli { command } = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let mut cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    let _span = telemetry::init(&cfg.log_level, command.name())?;

    // -----------------------------------------------------------------------
    // 4. Run
    // -----------------------------------------------------------------------
    let key = if command.needs_key() {
        Some(cfg.take_key()?)
    } else {
        None
    };
    let store = JsonFileStore::new(&cfg.store_file);
    let name = command.name();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %store.file_path().display(),
        "envelope-cli starting"
    );

    let output = command
        .run(key.as_ref().map(KeyMaterial::as_bytes), &store)
        .with_context(|| format!("{name} failed"))?;
    if let Some(out) = output {
        println!("{out}");
    }
    Ok(())
}
