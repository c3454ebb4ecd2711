//! RESICO command - flat rate over gross income

use std::io::Write;

use anyhow::Result;
use clap::Args;
use isr_core::calculations::ResicoCalculator;
use isr_core::format::format_currency;
use isr_core::{Period, ResicoAdvancedInput};
use rust_decimal::Decimal;

use super::{Session, parse_amount};
use crate::report;

#[derive(Args, Debug)]
#[command(allow_negative_numbers = true)]
pub struct ResicoCommand {
    /// Gross income for the period (accepts "$1,250,000.00")
    #[arg(value_parser = parse_amount)]
    income: Decimal,

    /// Period: mensual or anual. Defaults to the configured period.
    #[arg(short, long)]
    period: Option<Period>,

    /// Net withholding and provisional payments against the ISR
    #[arg(long)]
    advanced: bool,

    /// ISR withheld by clients (advanced)
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    withheld_isr: Decimal,

    /// Provisional payments already made (advanced)
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    provisional_payments: Decimal,

    /// VAT withheld by clients; reported, not used in the ISR (advanced)
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    withheld_iva: Decimal,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl ResicoCommand {
    pub fn exec(
        &self,
        session: &Session,
        out: &mut dyn Write,
    ) -> Result<()> {
        let period = self.period.unwrap_or(session.defaults.period);
        let calculator = ResicoCalculator::new(&session.tables);
        let heading = format!("RESICO ({period})");

        if self.advanced {
            let input = ResicoAdvancedInput {
                total_income: self.income,
                withheld_isr: self.withheld_isr,
                provisional_payments: self.provisional_payments,
                withheld_iva: self.withheld_iva,
            };
            let result = calculator.calculate_advanced(&input, period);
            if self.json {
                return report::write_json(out, &result);
            }
            report::write_advanced(out, &heading, &result)?;
            if self.withheld_iva > Decimal::ZERO {
                writeln!(out, "IVA retenido (informativo): {}", format_currency(self.withheld_iva, true))?;
            }
            return Ok(());
        }

        let result = calculator.calculate(self.income, period);
        if self.json {
            return report::write_json(out, &result);
        }
        report::write_result(out, &heading, self.income, &result)?;
        if period == Period::Annual && !calculator.is_eligible(self.income) && self.income > Decimal::ZERO {
            writeln!(
                out,
                "Aviso: el ingreso supera el límite de {} para RESICO",
                format_currency(session.tables.resico_max_income, true)
            )?;
        }
        Ok(())
    }
}
