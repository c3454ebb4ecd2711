//! Batch command - one advanced calculation per CSV row

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use isr_core::{AdvancedCalculationResult, Regime};
use isr_data::batch;
use serde::Serialize;
use tracing::info;

use super::Session;
use crate::report::{self, BatchRow};

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV file with one calculation per row
    file: PathBuf,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct BatchOutput {
    row: usize,
    regime: Regime,
    result: AdvancedCalculationResult,
}

impl BatchCommand {
    pub fn exec(
        &self,
        session: &Session,
        out: &mut dyn Write,
    ) -> Result<()> {
        let entries = batch::load_from_file(&self.file, &session.defaults)
            .with_context(|| format!("loading batch file '{}'", self.file.display()))?;

        let outputs: Vec<BatchOutput> = entries
            .iter()
            .map(|entry| BatchOutput {
                row: entry.row,
                regime: entry.context.regime,
                result: entry
                    .context
                    .calculate_advanced(&session.tables, &entry.request),
            })
            .collect();
        info!(rows = outputs.len(), "batch calculated");

        if self.json {
            return report::write_json(out, &outputs);
        }

        if outputs.is_empty() {
            writeln!(out, "Sin filas en {}", self.file.display())?;
            return Ok(());
        }
        let rows = outputs
            .iter()
            .map(|o| BatchRow::new(o.row, o.regime.as_str(), &o.result))
            .collect();
        report::write_batch(out, rows)
    }
}
