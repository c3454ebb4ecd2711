//! Project command - RESICO annual projection from an average monthly income

use std::io::Write;

use anyhow::Result;
use clap::Args;
use isr_core::calculations::ResicoCalculator;
use isr_core::format::{abbreviate_number, format_currency};
use isr_core::{CalculationResult, Month};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{Session, parse_amount, parse_month};
use crate::report;

#[derive(Args, Debug)]
pub struct ProjectCommand {
    /// Average monthly income
    #[arg(value_parser = parse_amount)]
    monthly_income: Decimal,

    /// Month to estimate the accumulated provisional payment for. Defaults to the configured month.
    #[arg(short, long, value_parser = parse_month)]
    month: Option<Month>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Projection {
    annual_income: Decimal,
    eligible: bool,
    annual: CalculationResult,
    month: Month,
    /// ISR for this month given the income of the earlier months.
    month_provisional: Decimal,
    /// ISR over the income accumulated up to this month.
    accumulated_provisional: Decimal,
}

impl ProjectCommand {
    pub fn exec(
        &self,
        session: &Session,
        out: &mut dyn Write,
    ) -> Result<()> {
        let month = self.month.unwrap_or(session.defaults.month);
        let calculator = ResicoCalculator::new(&session.tables);
        let annual_income = self.monthly_income * Decimal::from(12);
        let earlier = self.monthly_income * Decimal::from(month.number() - 1);

        let projection = Projection {
            annual_income,
            eligible: calculator.is_eligible(annual_income),
            annual: calculator.project_annual(self.monthly_income),
            month,
            month_provisional: calculator.calculate_monthly_provisional(self.monthly_income, earlier),
            accumulated_provisional: calculator.estimate_monthly_payment(annual_income, month),
        };

        if self.json {
            return report::write_json(out, &projection);
        }

        let heading = format!("Proyección RESICO ({} anuales)", abbreviate_number(annual_income));
        report::write_result(out, &heading, annual_income, &projection.annual)?;
        writeln!(
            out,
            "Pago de {}: {} (acumulado: {})",
            month.name().to_lowercase(),
            format_currency(projection.month_provisional, true),
            format_currency(projection.accumulated_provisional, true)
        )?;
        if !projection.eligible {
            writeln!(out, "Aviso: el ingreso proyectado no es elegible para RESICO")?;
        }
        Ok(())
    }
}
