use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Upper bound stored in the last bracket of an open-ended table.
pub const UNBOUNDED_MAX: Decimal = dec!(999999999.99);

/// Common view over the bracket shapes so lookup and validation stay generic.
pub trait Bracket {
    fn min(&self) -> Decimal;
    fn max(&self) -> Decimal;
    fn rate(&self) -> Decimal;

    /// True when `max` is the unbounded sentinel.
    fn is_open_ended(&self) -> bool {
        self.max() >= UNBOUNDED_MAX
    }

    fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min() && amount <= self.max()
    }
}

/// Flat-rate bracket (RESICO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: Decimal,
    pub max: Decimal,
    pub rate: Decimal,
}

/// Progressive bracket: tax = `fixed_fee + (amount - min) * rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracketWithQuota {
    pub min: Decimal,
    pub max: Decimal,
    pub fixed_fee: Decimal,
    pub rate: Decimal,
}

impl TaxBracketWithQuota {
    /// Tax owed for `amount` under this bracket, unrounded.
    pub fn tax_for(&self, amount: Decimal) -> Decimal {
        self.fixed_fee + (amount - self.min) * self.rate
    }
}

impl Bracket for TaxBracket {
    fn min(&self) -> Decimal {
        self.min
    }

    fn max(&self) -> Decimal {
        self.max
    }

    fn rate(&self) -> Decimal {
        self.rate
    }
}

impl Bracket for TaxBracketWithQuota {
    fn min(&self) -> Decimal {
        self.min
    }

    fn max(&self) -> Decimal {
        self.max
    }

    fn rate(&self) -> Decimal {
        self.rate
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let bracket = TaxBracket {
            min: dec!(0.01),
            max: dec!(300000.00),
            rate: dec!(0.01),
        };

        assert!(bracket.contains(dec!(0.01)));
        assert!(bracket.contains(dec!(300000.00)));
        assert!(!bracket.contains(dec!(300000.01)));
        assert!(!bracket.contains(dec!(0)));
    }

    #[test]
    fn sentinel_marks_open_ended_bracket() {
        let bracket = TaxBracketWithQuota {
            min: dec!(375975.62),
            max: UNBOUNDED_MAX,
            fixed_fee: dec!(117912.32),
            rate: dec!(0.35),
        };

        assert!(bracket.is_open_ended());
    }

    #[test]
    fn tax_for_applies_fee_plus_excess() {
        let bracket = TaxBracketWithQuota {
            min: dec!(746.05),
            max: dec!(6332.05),
            fixed_fee: dec!(14.32),
            rate: dec!(0.064),
        };

        // 14.32 + (1746.05 - 746.05) * 0.064 = 14.32 + 64 = 78.32
        assert_eq!(bracket.tax_for(dec!(1746.05)), dec!(78.32));
    }
}
