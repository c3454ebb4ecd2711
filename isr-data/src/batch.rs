//! CSV loader for batch calculation input.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column                 | Required | Type    | Notes |
//! |------------------------|----------|---------|-------|
//! | `regime`               | yes      | string  | `RESICO`, `EMPRESARIAL` or `MORAL` (case-insensitive) |
//! | `income`               | yes      | decimal | |
//! | `deductions`           | no       | decimal | Actividad Empresarial, Persona Moral |
//! | `previous_losses`      | no       | decimal | Persona Moral |
//! | `withheld_isr`         | no       | decimal | |
//! | `provisional_payments` | no       | decimal | |
//! | `period`               | no       | string  | `mensual` / `anual`; RESICO only |
//! | `month`                | no       | integer | 1–12; Actividad Empresarial only |
//!
//! Empty optional cells fall back to zero (amounts) or to the defaults the
//! caller passes in (period, month).
//!
//! ```csv
//! regime,income,deductions,previous_losses,withheld_isr,provisional_payments,period,month
//! RESICO,300000,,,,,anual,
//! EMPRESARIAL,3000000,2160000,,,150000,,12
//! MORAL,5000000,3820000,0,4000,300000,,
//! ```

use std::path::Path;

use isr_core::{CalculationRequest, CalculatorContext, Month, Period, Regime};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    regime: String,
    income: Decimal,
    deductions: Option<Decimal>,
    previous_losses: Option<Decimal>,
    withheld_isr: Option<Decimal>,
    provisional_payments: Option<Decimal>,
    period: Option<String>,
    month: Option<u8>,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One calculation to run: the selections plus the amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// 1-based data row number.
    pub row: usize,
    pub context: CalculatorContext,
    pub request: CalculationRequest,
}

/// Errors that can occur while loading batch input.
#[derive(Debug, thiserror::Error)]
pub enum BatchLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read batch file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unrecognised regime '{value}' on row {row}")]
    InvalidRegime { value: String, row: usize },

    #[error("unrecognised period '{value}' on row {row}")]
    InvalidPeriod { value: String, row: usize },

    #[error("month {value} on row {row} is not between 1 and 12")]
    InvalidMonth { value: u8, row: usize },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
    defaults: &CalculatorContext,
) -> Result<BatchEntry, BatchLoadError> {
    let regime = Regime::parse(&row.regime).ok_or_else(|| BatchLoadError::InvalidRegime {
        value: row.regime.clone(),
        row: row_number,
    })?;

    let period = match row.period.as_deref().map(str::trim) {
        None | Some("") => defaults.period,
        Some(value) => value
            .parse::<Period>()
            .map_err(|_| BatchLoadError::InvalidPeriod {
                value: value.to_string(),
                row: row_number,
            })?,
    };

    let month = match row.month {
        None => defaults.month,
        Some(value) => Month::new(value).map_err(|_| BatchLoadError::InvalidMonth {
            value,
            row: row_number,
        })?,
    };

    Ok(BatchEntry {
        row: row_number,
        context: CalculatorContext {
            regime,
            period,
            month,
            ..*defaults
        },
        request: CalculationRequest {
            income: row.income,
            deductions: row.deductions.unwrap_or_default(),
            previous_losses: row.previous_losses.unwrap_or_default(),
            withheld_isr: row.withheld_isr.unwrap_or_default(),
            provisional_payments: row.provisional_payments.unwrap_or_default(),
        },
    })
}

/// Parse batch CSV text. Rows are returned in file order.
///
/// # Errors
///
/// * [`BatchLoadError::Parse`] – structurally invalid CSV or a required field
///   that cannot be deserialised.
/// * [`BatchLoadError::InvalidRegime`], [`BatchLoadError::InvalidPeriod`],
///   [`BatchLoadError::InvalidMonth`] – an unrecognised cell value.
pub fn load_from_str(
    input: &str,
    defaults: &CalculatorContext,
) -> Result<Vec<BatchEntry>, BatchLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1, defaults))
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(
    path: &Path,
    defaults: &CalculatorContext,
) -> Result<Vec<BatchEntry>, BatchLoadError> {
    let contents = std::fs::read_to_string(path)?;
    let entries = load_from_str(&contents, defaults)?;
    info!(path = %path.display(), rows = entries.len(), "loaded batch input");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_CSV: &str = "\
regime,income
RESICO,300000
";

    const FULL_CSV: &str = "\
regime,income,deductions,previous_losses,withheld_isr,provisional_payments,period,month
RESICO,30000,,,,,mensual,
EMPRESARIAL,3000000,2160000,,5000,150000,,6
MORAL,5000000,3820000,100000,4000,300000,,
";

    #[test]
    fn test_minimal_csv_uses_defaults() {
        let entries = load_from_str(MINIMAL_CSV, &CalculatorContext::default()).expect("should parse");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].row, 1);
        assert_eq!(entries[0].context, CalculatorContext::default());
        assert_eq!(entries[0].request, CalculationRequest::income(dec!(300000)));
    }

    #[test]
    fn test_full_csv_maps_every_column() {
        let entries = load_from_str(FULL_CSV, &CalculatorContext::default()).expect("should parse");

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].context.period, Period::Monthly);

        let empresarial = &entries[1];
        assert_eq!(empresarial.context.regime, Regime::ActividadEmpresarial);
        assert_eq!(empresarial.context.month, Month::new(6).unwrap());
        assert_eq!(empresarial.request.deductions, dec!(2160000));
        assert_eq!(empresarial.request.withheld_isr, dec!(5000));
        assert_eq!(empresarial.request.provisional_payments, dec!(150000));

        let moral = &entries[2];
        assert_eq!(moral.context.regime, Regime::PersonaMoral);
        assert_eq!(moral.request.previous_losses, dec!(100000));
    }

    #[test]
    fn test_defaults_carry_coefficient() {
        let defaults = CalculatorContext {
            utility_coefficient: dec!(0.15),
            ..Default::default()
        };

        let entries = load_from_str("regime,income\nMORAL,100\n", &defaults).expect("should parse");

        assert_eq!(entries[0].context.utility_coefficient, dec!(0.15));
    }

    #[test]
    fn test_invalid_regime_reports_row() {
        let csv = "regime,income\nRESICO,1\nFOO,2\n";

        match load_from_str(csv, &CalculatorContext::default()).unwrap_err() {
            BatchLoadError::InvalidRegime { value, row } => {
                assert_eq!(value, "FOO");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidRegime, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_period() {
        let csv = "regime,income,period\nRESICO,1,semanal\n";

        let err = load_from_str(csv, &CalculatorContext::default()).unwrap_err();

        assert!(matches!(err, BatchLoadError::InvalidPeriod { row: 1, .. }));
    }

    #[test]
    fn test_invalid_month() {
        let csv = "regime,income,month\nEMPRESARIAL,1,13\n";

        let err = load_from_str(csv, &CalculatorContext::default()).unwrap_err();

        assert!(matches!(err, BatchLoadError::InvalidMonth { value: 13, row: 1 }));
    }

    #[test]
    fn test_missing_income_column() {
        let csv = "regime\nRESICO\n";

        let err = load_from_str(csv, &CalculatorContext::default()).unwrap_err();

        assert!(matches!(err, BatchLoadError::Parse(_)));
    }

    #[test]
    fn test_header_only_is_empty() {
        let entries =
            load_from_str("regime,income\n", &CalculatorContext::default()).expect("header-only CSV is valid");

        assert!(entries.is_empty());
    }
}
