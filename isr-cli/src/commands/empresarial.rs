//! Actividad Empresarial command - progressive table over income less deductions

use std::io::Write;

use anyhow::Result;
use clap::Args;
use isr_core::calculations::EmpresarialCalculator;
use isr_core::calculations::analysis::{max_deductible, validate_deductions};
use isr_core::format::format_currency;
use isr_core::{EmpresarialAdvancedInput, Month};
use rust_decimal::Decimal;
use tracing::warn;

use super::{Session, parse_amount, parse_month};
use crate::report;

#[derive(Args, Debug)]
#[command(allow_negative_numbers = true)]
pub struct EmpresarialCommand {
    /// Income accumulated from January to the selected month
    #[arg(value_parser = parse_amount)]
    income: Decimal,

    /// Authorized deductions for the same period
    #[arg(short, long, value_parser = parse_amount, default_value = "0")]
    deductions: Decimal,

    /// Month the accumulation ends in (1-12). Defaults to the configured month.
    #[arg(short, long, value_parser = parse_month)]
    month: Option<Month>,

    /// Net withholding and provisional payments against the ISR
    #[arg(long)]
    advanced: bool,

    /// ISR withheld by clients (advanced)
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    withheld_isr: Decimal,

    /// Provisional payments already made (advanced)
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    provisional_payments: Decimal,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl EmpresarialCommand {
    pub fn exec(
        &self,
        session: &Session,
        out: &mut dyn Write,
    ) -> Result<()> {
        let month = self.month.unwrap_or(session.defaults.month);
        let calculator = EmpresarialCalculator::new(&session.tables);
        let heading = format!("Actividad Empresarial (enero a {})", month.name().to_lowercase());

        let deductions_ok = validate_deductions(self.income, self.deductions);
        if !deductions_ok {
            warn!(income = %self.income, deductions = %self.deductions, "deductions above 95% of income");
        }

        if self.advanced {
            let input = EmpresarialAdvancedInput {
                total_income: self.income,
                total_deductions: self.deductions,
                provisional_payments: self.provisional_payments,
                withheld_isr: self.withheld_isr,
            };
            let result = calculator.calculate_advanced(&input, month);
            if self.json {
                return report::write_json(out, &result);
            }
            report::write_advanced(out, &heading, &result)?;
        } else {
            let result = calculator.calculate(self.income, self.deductions, month);
            if self.json {
                return report::write_json(out, &result);
            }
            report::write_result(out, &heading, self.income, &result)?;
        }

        if !deductions_ok && self.income > Decimal::ZERO {
            writeln!(
                out,
                "Aviso: las deducciones superan el 95% del ingreso (sugerido: hasta {})",
                format_currency(max_deductible(self.income), true)
            )?;
        }
        Ok(())
    }
}
