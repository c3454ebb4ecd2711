//! Ratios and limits used to sanity-check calculator input and output.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::round_half_up;

/// Share of income that deductions may reach before they look implausible.
pub const MAX_DEDUCTION_RATIO: Decimal = dec!(0.95);

/// Share of income suggested as a deduction ceiling.
pub const SUGGESTED_DEDUCTIBLE_RATIO: Decimal = dec!(0.80);

/// Tax as a percentage of income, rounded to cents. Zero when income is not positive.
///
/// ```
/// use rust_decimal_macros::dec;
/// use isr_core::calculations::analysis::effective_rate;
///
/// assert_eq!(effective_rate(dec!(3000), dec!(300000)), dec!(1.00));
/// assert_eq!(effective_rate(dec!(3000), dec!(0)), dec!(0));
/// ```
pub fn effective_rate(
    tax: Decimal,
    income: Decimal,
) -> Decimal {
    if income <= Decimal::ZERO || tax <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(tax / income * Decimal::ONE_HUNDRED)
}

/// Whether `deductions` stay within 95 % of `income`.
pub fn validate_deductions(
    income: Decimal,
    deductions: Decimal,
) -> bool {
    deductions <= income * MAX_DEDUCTION_RATIO
}

/// Suggested maximum deduction for `income` (80 %).
pub fn max_deductible(income: Decimal) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(income * SUGGESTED_DEDUCTIBLE_RATIO)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn effective_rate_of_progressive_tax() {
        assert_eq!(effective_rate(dec!(185603.84), dec!(840000)), dec!(22.10));
    }

    #[test]
    fn effective_rate_guards_zero_income() {
        assert_eq!(effective_rate(dec!(100), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn deductions_limit_is_inclusive() {
        assert!(validate_deductions(dec!(1000000), dec!(950000)));
        assert!(!validate_deductions(dec!(1000000), dec!(950000.01)));
    }

    #[test]
    fn max_deductible_is_eighty_percent() {
        assert_eq!(max_deductible(dec!(1250000)), dec!(1000000.00));
        assert_eq!(max_deductible(dec!(-10)), Decimal::ZERO);
    }
}
