//! Provisional command - Persona Moral monthly payment schedule

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use isr_core::calculations::MoralCalculator;
use rust_decimal::Decimal;

use super::{Session, parse_amount, parse_coefficient};
use crate::report;

#[derive(Args, Debug)]
pub struct ProvisionalCommand {
    /// Income of each month, starting in January (up to 12 values)
    #[arg(required = true, num_args = 1.., value_parser = parse_amount)]
    monthly_incomes: Vec<Decimal>,

    /// Utility coefficient. Defaults to the configured coefficient.
    #[arg(short, long, value_parser = parse_coefficient)]
    coefficient: Option<Decimal>,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl ProvisionalCommand {
    pub fn exec(
        &self,
        session: &Session,
        out: &mut dyn Write,
    ) -> Result<()> {
        if self.monthly_incomes.len() > 12 {
            bail!("got {} monthly incomes; a fiscal year has 12 months", self.monthly_incomes.len());
        }

        let coefficient = self
            .coefficient
            .unwrap_or(session.defaults.utility_coefficient);
        let schedule = MoralCalculator::new(&session.tables)
            .provisional_payment_schedule(&self.monthly_incomes, coefficient);

        if self.json {
            return report::write_json(out, &schedule);
        }
        report::write_schedule(out, &schedule)
    }
}
