//! RESICO (Régimen Simplificado de Confianza) calculations.
//!
//! RESICO applies the rate of the bracket the income falls in to the *whole*
//! income; there is no fixed fee and no deduction.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Reject non-positive income (result "N/A") |
//! | 2    | Reject annual income above the RESICO ceiling ("Excede límite RESICO") |
//! | 3    | Resolve the bracket in the monthly or annual table |
//! | 4    | Tax = income × rate |
//! | 5    | Net income = income − tax |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use isr_core::calculations::ResicoCalculator;
//! use isr_core::tables::TaxTables;
//! use isr_core::Period;
//!
//! let tables = TaxTables::default();
//! let calculator = ResicoCalculator::new(&tables);
//! let result = calculator.calculate(dec!(300000), Period::Annual);
//!
//! assert_eq!(result.tax, dec!(3000.00));
//! assert_eq!(result.rate, dec!(1));
//! assert_eq!(result.net_income, dec!(297000.00));
//! assert_eq!(result.bracket.to_string(), "$0.01 - $300,000.00");
//! ```

use rust_decimal::Decimal;
use tracing::{debug, error};

use crate::calculations::common::{as_percent, non_negative, round_half_up, settle};
use crate::calculations::resolver::{BracketError, resolve_bracket};
use crate::models::{
    AdvancedCalculationResult, Bracket, BracketLabel, CalculationResult, Month, Period,
    ResicoAdvancedInput, TaxBracket,
};
use crate::tables::TaxTables;

/// How an income maps onto the RESICO table.
enum Lookup {
    Found(TaxBracket),
    NotApplicable,
    ExceedsLimit,
    Error,
}

/// Calculator for the RESICO regime.
#[derive(Debug, Clone)]
pub struct ResicoCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> ResicoCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Calculates RESICO ISR for `income` over `period`.
    ///
    /// Never fails: invalid input yields [`CalculationResult::not_applicable`],
    /// income past the ceiling yields [`CalculationResult::exceeds_limit`].
    pub fn calculate(
        &self,
        income: Decimal,
        period: Period,
    ) -> CalculationResult {
        let income = round_half_up(income);

        match self.lookup(income, period) {
            Lookup::Found(bracket) => {
                let tax = round_half_up(income * bracket.rate);
                debug!(income = %income, %period, tax = %tax, "RESICO calculated");
                CalculationResult {
                    tax,
                    rate: as_percent(bracket.rate),
                    bracket: BracketLabel::from_bracket(&bracket),
                    net_income: income - tax,
                }
            }
            Lookup::NotApplicable => CalculationResult::not_applicable(),
            Lookup::ExceedsLimit => CalculationResult::exceeds_limit(income),
            Lookup::Error => CalculationResult::calculation_error(income),
        }
    }

    /// Calculates RESICO ISR and nets withholding and provisional payments.
    pub fn calculate_advanced(
        &self,
        input: &ResicoAdvancedInput,
        period: Period,
    ) -> AdvancedCalculationResult {
        let income = round_half_up(input.total_income);

        let bracket = match self.lookup(income, period) {
            Lookup::Found(bracket) => bracket,
            Lookup::NotApplicable => return AdvancedCalculationResult::empty(),
            Lookup::ExceedsLimit => {
                return AdvancedCalculationResult::empty_with(BracketLabel::ExceedsLimit, income);
            }
            Lookup::Error => {
                return AdvancedCalculationResult::empty_with(
                    BracketLabel::CalculationError,
                    income,
                );
            }
        };

        let withheld_isr = non_negative("withheld_isr", input.withheld_isr);
        let provisional_payments = non_negative("provisional_payments", input.provisional_payments);

        let gross_isr = round_half_up(income * bracket.rate);
        let (final_isr, is_favor_balance) = settle(gross_isr, withheld_isr, provisional_payments);

        debug!(
            income = %income,
            gross_isr = %gross_isr,
            final_isr = %final_isr,
            is_favor_balance,
            "RESICO advanced calculated"
        );

        AdvancedCalculationResult {
            tax: final_isr,
            rate: as_percent(bracket.rate),
            bracket: BracketLabel::from_bracket(&bracket),
            net_income: income - gross_isr,
            gross_income: income,
            total_deductions: Decimal::ZERO,
            taxable_base: income,
            gross_isr,
            withheld_isr,
            provisional_payments,
            final_isr,
            is_favor_balance,
        }
    }

    /// ISR attributable to one month's income given what was already
    /// accumulated earlier in the year, using the monthly table.
    ///
    /// Both amounts are taxed at the rate of the bracket their sum falls in.
    /// Returns zero when no bracket matches.
    pub fn calculate_monthly_provisional(
        &self,
        monthly_income: Decimal,
        accumulated_income: Decimal,
    ) -> Decimal {
        let monthly = non_negative("monthly_income", monthly_income);
        let accumulated = non_negative("accumulated_income", accumulated_income);
        let Some(total) = monthly.checked_add(accumulated) else {
            debug!(monthly = %monthly, accumulated = %accumulated, "accumulated income out of range");
            return Decimal::ZERO;
        };

        match resolve_bracket(total, &self.tables.resico_monthly) {
            Ok(bracket) => round_half_up(total * bracket.rate - accumulated * bracket.rate),
            Err(err) => {
                debug!(total = %total, %err, "no monthly provisional ISR");
                Decimal::ZERO
            }
        }
    }

    /// Annual projection from an average monthly income.
    ///
    /// A projection too large to represent is past the ceiling.
    pub fn project_annual(
        &self,
        monthly_income: Decimal,
    ) -> CalculationResult {
        match monthly_income.checked_mul(Decimal::from(12)) {
            Some(annual) => self.calculate(annual, Period::Annual),
            None => CalculationResult::exceeds_limit(Decimal::MAX),
        }
    }

    /// Whether `income` is within the RESICO eligibility range.
    pub fn is_eligible(
        &self,
        income: Decimal,
    ) -> bool {
        income > Decimal::ZERO && income <= self.tables.resico_max_income
    }

    /// Estimated cumulative provisional payment by `month` for an expected
    /// annual income, spread evenly across the year.
    pub fn estimate_monthly_payment(
        &self,
        annual_income: Decimal,
        month: Month,
    ) -> Decimal {
        if annual_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let Some(accumulated) = (annual_income / Decimal::from(12))
            .checked_mul(Decimal::from(month.number()))
            .map(round_half_up)
        else {
            return Decimal::ZERO;
        };

        match resolve_bracket(accumulated, &self.tables.resico_monthly) {
            Ok(bracket) => round_half_up(accumulated * bracket.rate),
            Err(_) => Decimal::ZERO,
        }
    }

    fn lookup(
        &self,
        income: Decimal,
        period: Period,
    ) -> Lookup {
        if income <= Decimal::ZERO {
            return Lookup::NotApplicable;
        }
        if period == Period::Annual && income > self.tables.resico_max_income {
            debug!(income = %income, "income exceeds RESICO ceiling");
            return Lookup::ExceedsLimit;
        }

        let table = self.tables.resico(period);
        match resolve_bracket(income, table) {
            Ok(bracket) => Lookup::Found(*bracket),
            Err(BracketError::NoMatchingBracket(amount))
                if table.last().is_some_and(|last| amount > last.max()) =>
            {
                debug!(income = %income, %period, "income above RESICO table");
                Lookup::ExceedsLimit
            }
            Err(err) => {
                error!(income = %income, %period, %err, "RESICO bracket lookup failed");
                Lookup::Error
            }
        }
    }
}
