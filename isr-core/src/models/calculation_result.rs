use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::format::format_currency;
use crate::models::Bracket;

/// Label describing which bracket (or which fallback) produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketLabel {
    Range { min: Decimal, max: Decimal },
    OpenEnded { min: Decimal },
    GeneralRate,
    NotApplicable,
    ExceedsLimit,
    NonPositiveBase,
    CalculationError,
}

impl BracketLabel {
    /// Range label for a resolved bracket; open-ended brackets read "En adelante".
    pub fn from_bracket<B: Bracket>(bracket: &B) -> Self {
        if bracket.is_open_ended() {
            Self::OpenEnded { min: bracket.min() }
        } else {
            Self::Range {
                min: bracket.min(),
                max: bracket.max(),
            }
        }
    }
}

impl fmt::Display for BracketLabel {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Range { min, max } => write!(
                f,
                "{} - {}",
                format_currency(*min, true),
                format_currency(*max, true)
            ),
            Self::OpenEnded { min } => write!(f, "{} - En adelante", format_currency(*min, true)),
            Self::GeneralRate => f.write_str("Tasa General"),
            Self::NotApplicable => f.write_str("N/A"),
            Self::ExceedsLimit => f.write_str("Excede límite RESICO"),
            Self::NonPositiveBase => f.write_str("Base gravable negativa o cero"),
            Self::CalculationError => f.write_str("Error en cálculo"),
        }
    }
}

impl Serialize for BracketLabel {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of a simple calculation.
///
/// `rate` is expressed as a percentage (1.1 means 1.1 %).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationResult {
    pub tax: Decimal,
    pub rate: Decimal,
    pub bracket: BracketLabel,
    pub net_income: Decimal,
}

impl CalculationResult {
    /// Zero result for invalid or non-positive input.
    pub fn not_applicable() -> Self {
        Self::zero(BracketLabel::NotApplicable, Decimal::ZERO)
    }

    /// Zero tax; the full amount is reported as net income.
    pub fn exceeds_limit(amount: Decimal) -> Self {
        Self::zero(BracketLabel::ExceedsLimit, amount)
    }

    /// No bracket matched: a table integrity problem rather than bad input.
    pub fn calculation_error(amount: Decimal) -> Self {
        Self::zero(BracketLabel::CalculationError, amount)
    }

    pub fn non_positive_base() -> Self {
        Self::zero(BracketLabel::NonPositiveBase, Decimal::ZERO)
    }

    fn zero(
        bracket: BracketLabel,
        net_income: Decimal,
    ) -> Self {
        Self {
            tax: Decimal::ZERO,
            rate: Decimal::ZERO,
            bracket,
            net_income,
        }
    }
}

/// Outcome of an advanced calculation, which nets withholding and
/// provisional payments against the gross tax.
///
/// `tax` and `final_isr` are always non-negative; when credits exceed the
/// gross tax, `is_favor_balance` is set and the amount is a refund
/// (*saldo a favor*).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvancedCalculationResult {
    pub tax: Decimal,
    pub rate: Decimal,
    pub bracket: BracketLabel,
    pub net_income: Decimal,
    pub gross_income: Decimal,
    pub total_deductions: Decimal,
    pub taxable_base: Decimal,
    pub gross_isr: Decimal,
    pub withheld_isr: Decimal,
    pub provisional_payments: Decimal,
    pub final_isr: Decimal,
    pub is_favor_balance: bool,
}

impl AdvancedCalculationResult {
    pub fn empty() -> Self {
        Self::empty_with(BracketLabel::NotApplicable, Decimal::ZERO)
    }

    /// Empty result that still reports the gross income it was asked about.
    pub fn empty_with(
        bracket: BracketLabel,
        gross_income: Decimal,
    ) -> Self {
        Self {
            tax: Decimal::ZERO,
            rate: Decimal::ZERO,
            bracket,
            net_income: gross_income,
            gross_income,
            total_deductions: Decimal::ZERO,
            taxable_base: Decimal::ZERO,
            gross_isr: Decimal::ZERO,
            withheld_isr: Decimal::ZERO,
            provisional_payments: Decimal::ZERO,
            final_isr: Decimal::ZERO,
            is_favor_balance: false,
        }
    }

    /// The simple view of this result.
    pub fn summary(&self) -> CalculationResult {
        CalculationResult {
            tax: self.tax,
            rate: self.rate,
            bracket: self.bracket,
            net_income: self.net_income,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn range_label_formats_both_bounds() {
        let label = BracketLabel::Range {
            min: dec!(0.01),
            max: dec!(300000.00),
        };

        assert_eq!(label.to_string(), "$0.01 - $300,000.00");
    }

    #[test]
    fn open_ended_label() {
        let label = BracketLabel::OpenEnded {
            min: dec!(4511707.44),
        };

        assert_eq!(label.to_string(), "$4,511,707.44 - En adelante");
    }

    #[test]
    fn not_applicable_is_all_zero() {
        let result = CalculationResult::not_applicable();

        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.rate, Decimal::ZERO);
        assert_eq!(result.net_income, Decimal::ZERO);
        assert_eq!(result.bracket.to_string(), "N/A");
    }

    #[test]
    fn empty_advanced_result_is_not_favor_balance() {
        let result = AdvancedCalculationResult::empty();

        assert!(!result.is_favor_balance);
        assert_eq!(result.final_isr, Decimal::ZERO);
        assert_eq!(result.summary(), CalculationResult::not_applicable());
    }
}
