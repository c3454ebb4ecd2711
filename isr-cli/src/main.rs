use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use isr_cli::cli::Cli;
use isr_cli::commands::Session;
use isr_cli::config::Config;
use isr_cli::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let level = cli.log_level.as_deref().or(config.log_level.as_deref());
    let log_file = cli.log_file.as_deref().or(config.log_file.as_deref());
    logging::init(level, log_file)?;
    debug!(config = ?cli.config, "starting");

    let session = Session::from_config(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli.run(&session, &mut out)?;
    out.flush()?;
    Ok(())
}
