//! Actividad Empresarial calculations.
//!
//! Progressive ISR over the taxable base (income − deductions) using the
//! cumulative table for the month being declared:
//!
//! ```text
//! tax = fixed_fee + (taxable_base − min) × rate
//! ```
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use isr_core::calculations::EmpresarialCalculator;
//! use isr_core::tables::TaxTables;
//! use isr_core::Month;
//!
//! let tables = TaxTables::default();
//! let calculator = EmpresarialCalculator::new(&tables);
//! let result = calculator.calculate(dec!(3000000), dec!(2160000), Month::DECEMBER);
//!
//! // 110,842.68 + (840,000 − 590,796.12) × 30 %
//! assert_eq!(result.tax, dec!(185603.84));
//! assert_eq!(result.rate, dec!(30));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, error};

use crate::calculations::common::{as_percent, non_negative, round_half_up, settle, taxable_base};
use crate::calculations::resolver::{BracketError, resolve_bracket};
use crate::models::{
    AdvancedCalculationResult, Bracket, BracketLabel, CalculationResult, EmpresarialAdvancedInput,
    Month, TaxBracketWithQuota,
};
use crate::tables::TaxTables;

/// ISR for one base under the month's table, or the label explaining why none applies.
type Computed = Result<(TaxBracketWithQuota, Decimal), BracketLabel>;

/// Calculator for the Actividad Empresarial regime.
#[derive(Debug, Clone)]
pub struct EmpresarialCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> EmpresarialCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Calculates ISR for the cumulative period ending in `month`.
    ///
    /// `net_income` is reported against the taxable base, not the gross income.
    pub fn calculate(
        &self,
        income: Decimal,
        deductions: Decimal,
        month: Month,
    ) -> CalculationResult {
        let income = round_half_up(income);
        if income <= Decimal::ZERO {
            return CalculationResult::not_applicable();
        }

        let deductions = non_negative("deductions", deductions);
        let base = taxable_base(income, &[deductions]);
        if base <= Decimal::ZERO {
            return CalculationResult::non_positive_base();
        }

        match self.compute(base, month) {
            Ok((bracket, tax)) => CalculationResult {
                tax,
                rate: as_percent(bracket.rate),
                bracket: BracketLabel::from_bracket(&bracket),
                net_income: base - tax,
            },
            Err(BracketLabel::ExceedsLimit) => CalculationResult::exceeds_limit(base),
            Err(_) => CalculationResult::calculation_error(base),
        }
    }

    /// Calculates ISR and nets provisional payments and withholding.
    pub fn calculate_advanced(
        &self,
        input: &EmpresarialAdvancedInput,
        month: Month,
    ) -> AdvancedCalculationResult {
        let income = round_half_up(input.total_income);
        if income <= Decimal::ZERO {
            return AdvancedCalculationResult::empty();
        }

        let total_deductions = non_negative("total_deductions", input.total_deductions);
        let withheld_isr = non_negative("withheld_isr", input.withheld_isr);
        let provisional_payments = non_negative("provisional_payments", input.provisional_payments);
        let base = taxable_base(income, &[total_deductions]);

        let unresolved = |label| AdvancedCalculationResult {
            total_deductions,
            taxable_base: base,
            withheld_isr,
            provisional_payments,
            ..AdvancedCalculationResult::empty_with(label, income)
        };

        if base <= Decimal::ZERO {
            // No tax is caused; credits still come back as a favor balance.
            let (final_isr, is_favor_balance) =
                settle(Decimal::ZERO, withheld_isr, provisional_payments);
            return AdvancedCalculationResult {
                tax: final_isr,
                final_isr,
                is_favor_balance,
                ..unresolved(BracketLabel::NonPositiveBase)
            };
        }

        let (bracket, gross_isr) = match self.compute(base, month) {
            Ok(computed) => computed,
            Err(label) => return unresolved(label),
        };
        let (final_isr, is_favor_balance) = settle(gross_isr, withheld_isr, provisional_payments);

        debug!(
            base = %base,
            %month,
            gross_isr = %gross_isr,
            final_isr = %final_isr,
            is_favor_balance,
            "Actividad Empresarial advanced calculated"
        );

        AdvancedCalculationResult {
            tax: final_isr,
            rate: as_percent(bracket.rate),
            bracket: BracketLabel::from_bracket(&bracket),
            net_income: base - gross_isr,
            gross_income: income,
            total_deductions,
            taxable_base: base,
            gross_isr,
            withheld_isr,
            provisional_payments,
            final_isr,
            is_favor_balance,
        }
    }

    fn compute(
        &self,
        base: Decimal,
        month: Month,
    ) -> Computed {
        let table = self.tables.empresarial(month);

        match resolve_bracket(base, &table) {
            Ok(bracket) => {
                let tax = round_half_up(bracket.tax_for(base));
                debug!(base = %base, %month, tax = %tax, "Actividad Empresarial calculated");
                Ok((*bracket, tax))
            }
            Err(BracketError::NoMatchingBracket(amount))
                if table.last().is_some_and(|last| amount > last.max()) =>
            {
                debug!(base = %base, %month, "base above Actividad Empresarial table");
                Err(BracketLabel::ExceedsLimit)
            }
            Err(err) => {
                error!(base = %base, %month, %err, "Actividad Empresarial bracket lookup failed");
                Err(BracketLabel::CalculationError)
            }
        }
    }
}
