//! Calc command - runs the configured regime without naming it

use std::io::Write;

use anyhow::Result;
use clap::Args;
use isr_core::{CalculationRequest, Regime};
use rust_decimal::Decimal;

use super::{Session, parse_amount, parse_regime};
use crate::report;

#[derive(Args, Debug)]
#[command(allow_negative_numbers = true)]
pub struct CalcCommand {
    /// Income for the period
    #[arg(value_parser = parse_amount)]
    income: Decimal,

    /// Regime to use instead of the configured one
    #[arg(short, long, value_parser = parse_regime)]
    regime: Option<Regime>,

    /// Deductions (Actividad Empresarial, or Persona Moral with --advanced)
    #[arg(short, long, value_parser = parse_amount, default_value = "0")]
    deductions: Decimal,

    /// Previous losses (Persona Moral with --advanced)
    #[arg(short = 'l', long, value_parser = parse_amount, default_value = "0")]
    previous_losses: Decimal,

    /// Net withholding and provisional payments against the ISR
    #[arg(long)]
    advanced: bool,

    /// ISR withheld (advanced)
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    withheld_isr: Decimal,

    /// Provisional payments already made (advanced)
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    provisional_payments: Decimal,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl CalcCommand {
    pub fn exec(
        &self,
        session: &Session,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut context = session.defaults;
        if let Some(regime) = self.regime {
            context.regime = regime;
        }
        let request = CalculationRequest {
            income: self.income,
            deductions: self.deductions,
            previous_losses: self.previous_losses,
            withheld_isr: self.withheld_isr,
            provisional_payments: self.provisional_payments,
        };
        let heading = context.regime.config().title;

        if self.advanced {
            let result = context.calculate_advanced(&session.tables, &request);
            if self.json {
                return report::write_json(out, &result);
            }
            return report::write_advanced(out, heading, &result);
        }

        let result = context.calculate(&session.tables, &request);
        if self.json {
            return report::write_json(out, &result);
        }
        report::write_result(out, heading, self.income, &result)
    }
}
