pub mod batch;
pub mod calc;
pub mod empresarial;
pub mod moral;
pub mod project;
pub mod provisional;
pub mod regimes;
pub mod resico;
pub mod tables;

use anyhow::Result;
use isr_core::format::{format_currency, parse_decimal};
use isr_core::{CalculatorContext, Month, Regime, TaxTables, UNBOUNDED_MAX};
use rust_decimal::Decimal;

use crate::config::Config;

/// Tables and default selections every command runs against.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub tables: TaxTables,
    pub defaults: CalculatorContext,
}

impl Session {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            tables: config.tax_tables()?,
            defaults: config.calculator,
        })
    }
}

/// Amount argument: accepts `$` and comma thousands separators. Amounts
/// beyond the open-ended bracket sentinel are rejected.
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    let amount = parse_decimal(s).map_err(|e| e.to_string())?;
    if amount.abs() > UNBOUNDED_MAX {
        return Err(format!(
            "amount '{s}' is above the {} ceiling",
            format_currency(UNBOUNDED_MAX, true)
        ));
    }
    Ok(amount)
}

pub fn parse_month(s: &str) -> Result<Month, String> {
    let number: u8 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a month number"))?;
    Month::new(number).map_err(|e| e.to_string())
}

pub fn parse_regime(s: &str) -> Result<Regime, String> {
    Regime::parse(s).ok_or_else(|| format!("unknown regime '{s}' (expected RESICO, EMPRESARIAL or MORAL)"))
}

/// Utility coefficient argument, validated like the config value.
pub fn parse_coefficient(s: &str) -> Result<Decimal, String> {
    let coefficient = parse_amount(s)?;
    CalculatorContext {
        utility_coefficient: coefficient,
        ..Default::default()
    }
    .validate()
    .map_err(|e| e.to_string())?;
    Ok(coefficient)
}
