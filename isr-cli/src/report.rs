//! Plain-text and JSON rendering of calculation results.

use std::io::Write;

use anyhow::Result;
use isr_core::calculations::analysis::effective_rate;
use isr_core::format::{format_currency, format_percentage};
use isr_core::{
    AdvancedCalculationResult, Bracket, CalculationResult, ProvisionalPayment, RegimeConfig,
    TaxBracket, TaxBracketWithQuota,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

const LABEL_WIDTH: usize = 22;

fn money(value: Decimal) -> String {
    format_currency(value, true)
}

/// `rate` is already a percentage (1.1 means 1.1 %).
fn percent(rate: Decimal) -> String {
    format_percentage(rate / Decimal::ONE_HUNDRED, 2)
}

fn line(
    out: &mut dyn Write,
    label: &str,
    value: impl std::fmt::Display,
) -> Result<()> {
    writeln!(out, "{:<LABEL_WIDTH$}{}", format!("{label}:"), value)?;
    Ok(())
}

fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

pub fn write_json<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    value: &T,
) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Simple result; `income` is the amount the effective rate is measured against.
pub fn write_result(
    out: &mut dyn Write,
    heading: &str,
    income: Decimal,
    result: &CalculationResult,
) -> Result<()> {
    writeln!(out, "{heading}")?;
    line(out, "Ingreso", money(income))?;
    line(out, "Tramo", result.bracket)?;
    line(out, "Tasa", percent(result.rate))?;
    line(out, "ISR", money(result.tax))?;
    line(out, "Ingreso neto", money(result.net_income))?;
    line(out, "Tasa efectiva", percent(effective_rate(result.tax, income)))?;
    Ok(())
}

pub fn write_advanced(
    out: &mut dyn Write,
    heading: &str,
    result: &AdvancedCalculationResult,
) -> Result<()> {
    writeln!(out, "{heading}")?;
    line(out, "Ingresos totales", money(result.gross_income))?;
    line(out, "Deducciones", money(result.total_deductions))?;
    line(out, "Base gravable", money(result.taxable_base))?;
    line(out, "Tramo", result.bracket)?;
    line(out, "Tasa", percent(result.rate))?;
    line(out, "ISR causado", money(result.gross_isr))?;
    line(out, "ISR retenido", money(result.withheld_isr))?;
    line(out, "Pagos provisionales", money(result.provisional_payments))?;
    let label = if result.is_favor_balance {
        "Saldo a favor"
    } else {
        "ISR a pagar"
    };
    line(out, label, money(result.final_isr))?;
    line(out, "Ingreso neto", money(result.net_income))?;
    Ok(())
}

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "Mes")]
    month: String,
    #[tabled(rename = "Ingreso acumulado")]
    accumulated_income: String,
    #[tabled(rename = "Utilidad estimada")]
    estimated_utility: String,
    #[tabled(rename = "ISR determinado")]
    determined_isr: String,
    #[tabled(rename = "Pagos anteriores")]
    previous_payments: String,
    #[tabled(rename = "ISR a pagar")]
    isr_to_pay: String,
}

pub fn write_schedule(
    out: &mut dyn Write,
    schedule: &[ProvisionalPayment],
) -> Result<()> {
    if schedule.is_empty() {
        writeln!(out, "Sin ingresos mensuales")?;
        return Ok(());
    }

    let rows = schedule.iter().map(|p| ScheduleRow {
        month: p.month.to_string(),
        accumulated_income: money(p.accumulated_income),
        estimated_utility: money(p.estimated_utility),
        determined_isr: money(p.determined_isr),
        previous_payments: money(p.previous_payments),
        isr_to_pay: money(p.isr_to_pay),
    });
    writeln!(out, "{}", table(rows))?;

    let total: Decimal = schedule.iter().map(|p| p.isr_to_pay).sum();
    line(out, "Total pagado", money(total))?;
    Ok(())
}

#[derive(Tabled)]
struct FlatRow {
    #[tabled(rename = "Límite inferior")]
    min: String,
    #[tabled(rename = "Límite superior")]
    max: String,
    #[tabled(rename = "Tasa")]
    rate: String,
}

#[derive(Tabled)]
struct QuotaRow {
    #[tabled(rename = "Límite inferior")]
    min: String,
    #[tabled(rename = "Límite superior")]
    max: String,
    #[tabled(rename = "Cuota fija")]
    fixed_fee: String,
    #[tabled(rename = "Tasa excedente")]
    rate: String,
}

fn upper_bound<B: Bracket>(bracket: &B) -> String {
    if bracket.is_open_ended() {
        "En adelante".to_string()
    } else {
        money(bracket.max())
    }
}

pub fn write_flat_table(
    out: &mut dyn Write,
    heading: &str,
    brackets: &[TaxBracket],
) -> Result<()> {
    writeln!(out, "{heading}")?;
    let rows = brackets.iter().map(|b| FlatRow {
        min: money(b.min),
        max: upper_bound(b),
        rate: format_percentage(b.rate, 2),
    });
    writeln!(out, "{}", table(rows))?;
    Ok(())
}

pub fn write_quota_table(
    out: &mut dyn Write,
    heading: &str,
    brackets: &[TaxBracketWithQuota],
) -> Result<()> {
    writeln!(out, "{heading}")?;
    let rows = brackets.iter().map(|b| QuotaRow {
        min: money(b.min),
        max: upper_bound(b),
        fixed_fee: money(b.fixed_fee),
        rate: format_percentage(b.rate, 2),
    });
    writeln!(out, "{}", table(rows))?;
    Ok(())
}

pub fn write_regime(
    out: &mut dyn Write,
    config: &RegimeConfig,
) -> Result<()> {
    writeln!(out, "{} - {} [{}]", config.title, config.subtitle, config.regime.as_str())?;
    for characteristic in config.characteristics {
        writeln!(out, "  • {characteristic}")?;
    }
    Ok(())
}

#[derive(Tabled)]
pub struct BatchRow {
    #[tabled(rename = "Fila")]
    pub row: usize,
    #[tabled(rename = "Régimen")]
    pub regime: &'static str,
    #[tabled(rename = "Base gravable")]
    pub taxable_base: String,
    #[tabled(rename = "Tramo")]
    pub bracket: String,
    #[tabled(rename = "ISR causado")]
    pub gross_isr: String,
    #[tabled(rename = "Resultado")]
    pub outcome: String,
}

impl BatchRow {
    pub fn new(
        row: usize,
        regime: &'static str,
        result: &AdvancedCalculationResult,
    ) -> Self {
        let outcome = if result.is_favor_balance {
            format!("{} a favor", money(result.final_isr))
        } else {
            format!("{} a pagar", money(result.final_isr))
        };
        Self {
            row,
            regime,
            taxable_base: money(result.taxable_base),
            bracket: result.bracket.to_string(),
            gross_isr: money(result.gross_isr),
            outcome,
        }
    }
}

pub fn write_batch(
    out: &mut dyn Write,
    rows: Vec<BatchRow>,
) -> Result<()> {
    writeln!(out, "{}", table(rows))?;
    Ok(())
}
