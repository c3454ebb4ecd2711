//! Display and input helpers for amounts, percentages and dates.
//!
//! Output follows the Mexican convention: comma thousands separator, period
//! decimal separator, `$` symbol and Spanish month names.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use isr_core::format::{format_currency, format_percentage, parse_currency};
//!
//! assert_eq!(format_currency(dec!(1234567.891), true), "$1,234,567.89");
//! assert_eq!(format_percentage(dec!(0.15), 2), "15.00%");
//! assert_eq!(parse_currency("$1,234.50"), dec!(1234.50));
//! ```

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::calculations::common::round_half_up;
use crate::models::Month;

static CURRENCY_NOISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[$,\s]").expect("valid currency regex"));
static NON_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("valid digit regex"));

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Inserts comma separators into a run of ASCII digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats with two decimals and grouped thousands, keeping the sign.
fn format_grouped(value: Decimal) -> String {
    let fixed = format!("{:.2}", round_half_up(value).abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value.is_sign_negative() && !round_half_up(value).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{}.{fraction}", group_thousands(integer))
}

/// Formats an amount as currency.
///
/// The sign is dropped: favor balances are reported as positive amounts with
/// a separate flag.
pub fn format_currency(
    value: Decimal,
    include_symbol: bool,
) -> String {
    let formatted = format_grouped(value.abs());
    if include_symbol {
        format!("${formatted}")
    } else {
        formatted
    }
}

/// [`format_currency`] for raw floating point values; NaN and infinities format as zero.
pub fn format_currency_f64(
    value: f64,
    include_symbol: bool,
) -> String {
    format_currency(decimal_or_zero(value), include_symbol)
}

/// Two decimals with thousands separators, keeping the sign. Never panics;
/// non-finite input yields `"0.00"`.
///
/// ```
/// use isr_core::format::safe_number_format;
///
/// assert_eq!(safe_number_format(-1234.5), "-1,234.50");
/// assert_eq!(safe_number_format(f64::NAN), "0.00");
/// ```
pub fn safe_number_format(value: f64) -> String {
    format_grouped(decimal_or_zero(value))
}

/// Reformats free-form input as a whole number with separators.
///
/// Everything but digits is dropped; an empty result reads `"0"`.
pub fn format_currency_input(text: &str) -> String {
    let digits = NON_DIGIT_RE.replace_all(text, "");
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return "0".to_string();
    }
    group_thousands(trimmed)
}

/// Lenient currency parsing for user input: strips `$`, commas and
/// whitespace. Anything unparseable becomes zero.
pub fn parse_currency(text: &str) -> Decimal {
    let cleaned = CURRENCY_NOISE_RE.replace_all(text, "");
    cleaned.parse().unwrap_or(Decimal::ZERO)
}

/// Strict amount parsing.
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
/// Returns an error and logs when the input is invalid.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = s.trim().trim_start_matches('$').replace(',', "");
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid amount: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats a fraction as a percentage (`0.15` → `"15.00%"`).
pub fn format_percentage(
    fraction: Decimal,
    decimals: u32,
) -> String {
    let percent = (fraction * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.prec$}%", prec = decimals as usize)
}

/// Shortens large amounts: `1.5M`, `250.0K`. Amounts below 1,000 are
/// returned as is.
///
/// ```
/// use rust_decimal_macros::dec;
/// use isr_core::format::abbreviate_number;
///
/// assert_eq!(abbreviate_number(dec!(1500000)), "1.5M");
/// assert_eq!(abbreviate_number(dec!(250000)), "250.0K");
/// assert_eq!(abbreviate_number(dec!(999)), "999");
/// ```
pub fn abbreviate_number(value: Decimal) -> String {
    let one_decimal = |v: Decimal| {
        let rounded = v.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.1}")
    };

    if value >= Decimal::ONE_THOUSAND * Decimal::ONE_THOUSAND {
        format!("{}M", one_decimal(value / Decimal::from(1_000_000)))
    } else if value >= Decimal::ONE_THOUSAND {
        format!("{}K", one_decimal(value / Decimal::ONE_THOUSAND))
    } else {
        value.normalize().to_string()
    }
}

/// Long Spanish date: `18 de octubre de 2026`.
pub fn format_date(date: NaiveDate) -> String {
    let month = u8::try_from(date.month())
        .ok()
        .and_then(|m| Month::new(m).ok())
        .map(|m| m.name().to_lowercase())
        .unwrap_or_default();
    format!("{} de {} de {}", date.day(), month, date.year())
}

/// Short date: `18/10/2026`.
pub fn format_date_short(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn decimal_or_zero(value: f64) -> Decimal {
    if value.is_finite() {
        Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}
