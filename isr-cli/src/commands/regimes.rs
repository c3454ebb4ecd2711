use std::io::Write;

use anyhow::Result;
use clap::Args;
use isr_core::REGIMES;

use crate::report;

/// Lists the supported regimes and their characteristics.
#[derive(Args, Debug)]
pub struct RegimesCommand {
    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl RegimesCommand {
    pub fn exec(
        &self,
        out: &mut dyn Write,
    ) -> Result<()> {
        if self.json {
            return report::write_json(out, &REGIMES[..]);
        }

        for (i, config) in REGIMES.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            report::write_regime(out, config)?;
        }
        Ok(())
    }
}
