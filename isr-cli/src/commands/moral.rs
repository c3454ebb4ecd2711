//! Persona Moral command - general rate over the fiscal utility

use std::io::Write;

use anyhow::Result;
use clap::Args;
use isr_core::calculations::MoralCalculator;
use isr_core::format::{format_currency, format_percentage};
use isr_core::MoralAdvancedInput;
use rust_decimal::Decimal;

use super::{Session, parse_amount, parse_coefficient};
use crate::report;

#[derive(Args, Debug)]
#[command(allow_negative_numbers = true)]
pub struct MoralCommand {
    /// Annual income
    #[arg(value_parser = parse_amount)]
    income: Decimal,

    /// Authorized deductions. When given, the utility is income less deductions and losses.
    #[arg(short, long, value_parser = parse_amount)]
    deductions: Option<Decimal>,

    /// Losses carried over from earlier years
    #[arg(short = 'l', long, value_parser = parse_amount)]
    previous_losses: Option<Decimal>,

    /// Utility coefficient. Only for the simple calculation without deductions.
    #[arg(
        short,
        long,
        value_parser = parse_coefficient,
        conflicts_with_all = ["deductions", "previous_losses", "advanced"]
    )]
    coefficient: Option<Decimal>,

    /// Net withholding and provisional payments against the ISR
    #[arg(long)]
    advanced: bool,

    /// ISR withheld by third parties (advanced)
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    withheld_isr: Decimal,

    /// Provisional payments already made (advanced)
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    provisional_payments: Decimal,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl MoralCommand {
    pub fn exec(
        &self,
        session: &Session,
        out: &mut dyn Write,
    ) -> Result<()> {
        let calculator = MoralCalculator::new(&session.tables);

        if self.advanced {
            let input = MoralAdvancedInput {
                total_income: self.income,
                total_deductions: self.deductions.unwrap_or_default(),
                previous_losses: self.previous_losses.unwrap_or_default(),
                provisional_payments: self.provisional_payments,
                withheld_isr: self.withheld_isr,
            };
            let result = calculator.calculate_advanced(&input);
            if self.json {
                return report::write_json(out, &result);
            }
            return report::write_advanced(out, "Persona Moral", &result);
        }

        if self.deductions.is_some() || self.previous_losses.is_some() {
            let result = calculator.calculate_with_deductions(
                self.income,
                self.deductions.unwrap_or_default(),
                self.previous_losses.unwrap_or_default(),
            );
            if self.json {
                return report::write_json(out, &result);
            }
            return report::write_result(out, "Persona Moral", self.income, &result);
        }

        let coefficient = self
            .coefficient
            .unwrap_or(session.defaults.utility_coefficient);
        let utility = calculator.utility_from_coefficient(self.income, coefficient);
        let result = calculator.calculate(utility);
        if self.json {
            return report::write_json(out, &result);
        }

        report::write_result(out, "Persona Moral", self.income, &result)?;
        if utility > Decimal::ZERO {
            writeln!(
                out,
                "Utilidad fiscal estimada: {} (coeficiente {})",
                format_currency(utility, true),
                format_percentage(coefficient, 2)
            )?;
        }
        Ok(())
    }
}
