use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::commands::{
    Session, batch::BatchCommand, calc::CalcCommand, empresarial::EmpresarialCommand,
    moral::MoralCommand, project::ProjectCommand, provisional::ProvisionalCommand,
    regimes::RegimesCommand, resico::ResicoCommand, tables::TablesCommand,
};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Mexican income tax (ISR) calculator for RESICO, Actividad Empresarial
/// and Persona Moral taxpayers.
///
/// Uses the 2025 tables unless a config file points to other tables.
#[derive(Debug, Parser)]
#[command(name = "isr", version)]
pub struct Cli {
    /// TOML config file with defaults and table overrides.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (e.g. `debug`, `warn,isr_core=trace`).
    /// Overrides the config file and `RUST_LOG`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate with the configured (or given) regime
    Calc(CalcCommand),
    /// RESICO: flat rate over gross income
    Resico(ResicoCommand),
    /// Actividad Empresarial: progressive table over income less deductions
    Empresarial(EmpresarialCommand),
    /// Persona Moral: general rate over the fiscal utility
    Moral(MoralCommand),
    /// Persona Moral provisional payment schedule
    Provisional(ProvisionalCommand),
    /// RESICO annual projection from an average monthly income
    Project(ProjectCommand),
    /// Print the rate tables in use
    Tables(TablesCommand),
    /// List the supported regimes
    Regimes(RegimesCommand),
    /// Run one advanced calculation per CSV row
    Batch(BatchCommand),
}

// ─── dispatch ────────────────────────────────────────────────────────────────

impl Cli {
    pub fn run(
        &self,
        session: &Session,
        out: &mut dyn Write,
    ) -> Result<()> {
        debug!(command = ?self.command, "running");

        match &self.command {
            Command::Calc(cmd) => cmd.exec(session, out),
            Command::Resico(cmd) => cmd.exec(session, out),
            Command::Empresarial(cmd) => cmd.exec(session, out),
            Command::Moral(cmd) => cmd.exec(session, out),
            Command::Provisional(cmd) => cmd.exec(session, out),
            Command::Project(cmd) => cmd.exec(session, out),
            Command::Tables(cmd) => cmd.exec(session, out),
            Command::Regimes(cmd) => cmd.exec(out),
            Command::Batch(cmd) => cmd.exec(session, out),
        }
    }
}
