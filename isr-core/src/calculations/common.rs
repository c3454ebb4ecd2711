//! Common utility functions for ISR calculations.
//!
//! This module provides shared functionality used across the regime
//! calculators: rounding, input sanitizing and credit netting.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::warn;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use isr_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use isr_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Converts a raw floating point input into a monetary amount.
///
/// NaN, infinities and negative values become zero, matching how the
/// calculators treat invalid input.
///
/// ```
/// use rust_decimal_macros::dec;
/// use isr_core::calculations::common::sanitize_amount;
///
/// assert_eq!(sanitize_amount(1250.5), dec!(1250.50));
/// assert_eq!(sanitize_amount(f64::NAN), dec!(0));
/// assert_eq!(sanitize_amount(-5.0), dec!(0));
/// ```
pub fn sanitize_amount(value: f64) -> Decimal {
    if !value.is_finite() || value < 0.0 {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value)
        .map(round_half_up)
        .unwrap_or(Decimal::ZERO)
}

/// Clamps a credit or deduction to zero, logging when a negative value is dropped.
pub fn non_negative(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, value = %value, "negative amount treated as zero");
        Decimal::ZERO
    } else {
        round_half_up(value)
    }
}

/// Taxable base: income minus the given subtractions, never below zero.
///
/// Subtractions too large to add up leave no base.
pub fn taxable_base(
    income: Decimal,
    subtractions: &[Decimal],
) -> Decimal {
    subtractions
        .iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(*amount))
        .and_then(|total| income.checked_sub(total))
        .map_or(Decimal::ZERO, |base| max(round_half_up(base), Decimal::ZERO))
}

/// Nets withholding and provisional payments against gross tax.
///
/// Returns the absolute balance and whether it is in the taxpayer's favor.
pub fn settle(
    gross_isr: Decimal,
    withheld_isr: Decimal,
    provisional_payments: Decimal,
) -> (Decimal, bool) {
    let credits = withheld_isr.saturating_add(provisional_payments);
    let balance = round_half_up(gross_isr.saturating_sub(credits));
    (balance.abs(), balance < Decimal::ZERO)
}

/// Converts a fractional rate into the percentage reported in results.
pub fn as_percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}
