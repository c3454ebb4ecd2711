//! Official 2025 ISR rate tables.
//!
//! The RESICO tables apply a single rate to the whole income of the bracket it
//! falls in. The Actividad Empresarial table is the month-1 progressive table;
//! the cumulative table for any later month is obtained with
//! [`table_for_month`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::resolver::{TableError, validate_table};
use crate::models::{Month, Period, TaxBracket, TaxBracketWithQuota, UNBOUNDED_MAX};

/// RESICO 2025, monthly.
pub const RESICO_TAX_TABLE_2025: &[TaxBracket] = &[
    TaxBracket { min: dec!(0.01), max: dec!(25000.00), rate: dec!(0.01) },
    TaxBracket { min: dec!(25000.01), max: dec!(50000.00), rate: dec!(0.011) },
    TaxBracket { min: dec!(50000.01), max: dec!(83333.33), rate: dec!(0.015) },
    TaxBracket { min: dec!(83333.34), max: dec!(208333.33), rate: dec!(0.02) },
    TaxBracket { min: dec!(208333.34), max: dec!(3500000.00), rate: dec!(0.025) },
];

/// RESICO 2025, annual.
pub const RESICO_TAX_TABLE_ANUAL_2025: &[TaxBracket] = &[
    TaxBracket { min: dec!(0.01), max: dec!(300000.00), rate: dec!(0.01) },
    TaxBracket { min: dec!(300000.01), max: dec!(600000.00), rate: dec!(0.011) },
    TaxBracket { min: dec!(600000.01), max: dec!(1000000.00), rate: dec!(0.015) },
    TaxBracket { min: dec!(1000000.01), max: dec!(2000000.00), rate: dec!(0.02) },
    TaxBracket { min: dec!(2000000.01), max: dec!(3500000.00), rate: dec!(0.025) },
];

/// Annual income ceiling for RESICO eligibility.
pub const RESICO_MAX_INCOME: Decimal = dec!(3500000);

/// Actividad Empresarial 2025, month 1.
pub const ACTIVIDAD_EMPRESARIAL_TABLE_MENSUAL_2025: &[TaxBracketWithQuota] = &[
    TaxBracketWithQuota { min: dec!(0.01), max: dec!(746.04), fixed_fee: dec!(0.00), rate: dec!(0.0192) },
    TaxBracketWithQuota { min: dec!(746.05), max: dec!(6332.05), fixed_fee: dec!(14.32), rate: dec!(0.064) },
    TaxBracketWithQuota { min: dec!(6332.06), max: dec!(11128.01), fixed_fee: dec!(371.83), rate: dec!(0.1088) },
    TaxBracketWithQuota { min: dec!(11128.02), max: dec!(12935.82), fixed_fee: dec!(893.63), rate: dec!(0.16) },
    TaxBracketWithQuota { min: dec!(12935.83), max: dec!(15487.71), fixed_fee: dec!(1182.88), rate: dec!(0.1792) },
    TaxBracketWithQuota { min: dec!(15487.72), max: dec!(31236.49), fixed_fee: dec!(1640.18), rate: dec!(0.2136) },
    TaxBracketWithQuota { min: dec!(31236.50), max: dec!(49233.00), fixed_fee: dec!(5004.12), rate: dec!(0.2352) },
    TaxBracketWithQuota { min: dec!(49233.01), max: dec!(93993.90), fixed_fee: dec!(9236.89), rate: dec!(0.30) },
    TaxBracketWithQuota { min: dec!(93993.91), max: dec!(125325.20), fixed_fee: dec!(22665.17), rate: dec!(0.32) },
    TaxBracketWithQuota { min: dec!(125325.21), max: dec!(375975.61), fixed_fee: dec!(32691.18), rate: dec!(0.34) },
    TaxBracketWithQuota { min: dec!(375975.62), max: UNBOUNDED_MAX, fixed_fee: dec!(117912.32), rate: dec!(0.35) },
];

/// Persona Moral general regime rate over fiscal utility.
pub const PERSONA_MORAL_RATE: Decimal = dec!(0.30);

/// Default utility coefficient used to estimate fiscal utility from income.
pub const DEFAULT_UTILITY_COEFFICIENT: Decimal = dec!(0.2360);

/// Builds the cumulative table for `month` from a month-1 table.
///
/// `min`, `max` and `fixed_fee` are multiplied by the month number; the
/// unbounded sentinel is left as is.
///
/// ```
/// use isr_core::models::Month;
/// use isr_core::tables::{ACTIVIDAD_EMPRESARIAL_TABLE_MENSUAL_2025, table_for_month};
/// use rust_decimal_macros::dec;
///
/// let month = Month::new(12).unwrap();
/// let table = table_for_month(ACTIVIDAD_EMPRESARIAL_TABLE_MENSUAL_2025, month);
///
/// assert_eq!(table[7].min, dec!(590796.12));
/// assert_eq!(table[7].fixed_fee, dec!(110842.68));
/// ```
pub fn table_for_month(
    base: &[TaxBracketWithQuota],
    month: Month,
) -> Vec<TaxBracketWithQuota> {
    let factor = Decimal::from(month.number());

    base.iter()
        .map(|bracket| TaxBracketWithQuota {
            min: bracket.min.saturating_mul(factor),
            max: if bracket.max >= UNBOUNDED_MAX {
                UNBOUNDED_MAX
            } else {
                bracket.max.saturating_mul(factor)
            },
            fixed_fee: bracket.fixed_fee.saturating_mul(factor),
            rate: bracket.rate,
        })
        .collect()
}

/// The full set of tables a calculation runs against.
///
/// `Default` yields the built-in 2025 tables; custom tables can be loaded
/// from CSV and swapped in field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTables {
    pub resico_monthly: Vec<TaxBracket>,
    pub resico_annual: Vec<TaxBracket>,
    pub resico_max_income: Decimal,
    pub empresarial_monthly: Vec<TaxBracketWithQuota>,
    pub moral_rate: Decimal,
}

impl TaxTables {
    pub fn builtin_2025() -> Self {
        Self {
            resico_monthly: RESICO_TAX_TABLE_2025.to_vec(),
            resico_annual: RESICO_TAX_TABLE_ANUAL_2025.to_vec(),
            resico_max_income: RESICO_MAX_INCOME,
            empresarial_monthly: ACTIVIDAD_EMPRESARIAL_TABLE_MENSUAL_2025.to_vec(),
            moral_rate: PERSONA_MORAL_RATE,
        }
    }

    /// RESICO table for the given period.
    pub fn resico(
        &self,
        period: Period,
    ) -> &[TaxBracket] {
        match period {
            Period::Monthly => &self.resico_monthly,
            Period::Annual => &self.resico_annual,
        }
    }

    /// Cumulative Actividad Empresarial table for `month`.
    pub fn empresarial(
        &self,
        month: Month,
    ) -> Vec<TaxBracketWithQuota> {
        table_for_month(&self.empresarial_monthly, month)
    }

    /// Checks every table for ordering and overlap problems.
    pub fn validate(&self) -> Result<(), TableError> {
        validate_table(&self.resico_monthly)?;
        validate_table(&self.resico_annual)?;
        validate_table(&self.empresarial_monthly)?;
        if self.moral_rate < Decimal::ZERO || self.moral_rate > Decimal::ONE {
            return Err(TableError::InvalidRate {
                index: 0,
                rate: self.moral_rate,
            });
        }
        Ok(())
    }
}

impl Default for TaxTables {
    fn default() -> Self {
        Self::builtin_2025()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Bracket;

    #[test]
    fn builtin_tables_are_valid() {
        assert_eq!(TaxTables::builtin_2025().validate(), Ok(()));
    }

    #[test]
    fn resico_tables_are_contiguous_to_the_cent() {
        for table in [RESICO_TAX_TABLE_2025, RESICO_TAX_TABLE_ANUAL_2025] {
            for pair in table.windows(2) {
                assert_eq!(pair[1].min - pair[0].max, dec!(0.01));
            }
        }
    }

    #[test]
    fn empresarial_table_ends_open() {
        let last = ACTIVIDAD_EMPRESARIAL_TABLE_MENSUAL_2025.last().unwrap();

        assert!(last.is_open_ended());
        assert_eq!(ACTIVIDAD_EMPRESARIAL_TABLE_MENSUAL_2025.len(), 11);
    }

    #[test]
    fn table_for_month_one_is_identity() {
        let table = table_for_month(ACTIVIDAD_EMPRESARIAL_TABLE_MENSUAL_2025, Month::JANUARY);

        assert_eq!(table, ACTIVIDAD_EMPRESARIAL_TABLE_MENSUAL_2025.to_vec());
    }

    #[test]
    fn table_for_month_scales_bounds_and_fee() {
        let month = Month::new(6).unwrap();
        let table = table_for_month(ACTIVIDAD_EMPRESARIAL_TABLE_MENSUAL_2025, month);

        assert_eq!(table[1].min, dec!(4476.30));
        assert_eq!(table[1].max, dec!(37992.30));
        assert_eq!(table[1].fixed_fee, dec!(85.92));
        assert_eq!(table[1].rate, dec!(0.064));
    }

    #[test]
    fn table_for_month_keeps_sentinel() {
        let table = table_for_month(ACTIVIDAD_EMPRESARIAL_TABLE_MENSUAL_2025, Month::DECEMBER);

        assert_eq!(table.last().unwrap().max, UNBOUNDED_MAX);
        assert_eq!(table.last().unwrap().min, dec!(4511707.44));
    }

    #[test]
    fn every_derived_month_is_valid() {
        for month in Month::all() {
            let table = table_for_month(ACTIVIDAD_EMPRESARIAL_TABLE_MENSUAL_2025, month);
            assert_eq!(validate_table(&table), Ok(()));
        }
    }

    #[test]
    fn resico_selects_table_by_period() {
        let tables = TaxTables::default();

        assert_eq!(tables.resico(Period::Monthly)[0].max, dec!(25000.00));
        assert_eq!(tables.resico(Period::Annual)[0].max, dec!(300000.00));
    }
}
