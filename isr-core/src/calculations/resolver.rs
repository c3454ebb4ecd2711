//! Bracket lookup and table integrity checks.
//!
//! Both functions are generic over [`Bracket`] so the flat RESICO tables and
//! the fixed-fee Actividad Empresarial tables share one implementation.
//!
//! Lookup is inclusive on both ends. Tables derived with
//! [`table_for_month`](crate::tables::table_for_month) are not contiguous to
//! the cent (scaling `min` and `max` by the month widens the gaps), so an
//! amount that lands between two brackets resolves to the lower one.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use isr_core::calculations::resolver::resolve_bracket;
//! use isr_core::tables::RESICO_TAX_TABLE_ANUAL_2025;
//!
//! let bracket = resolve_bracket(dec!(300000.00), RESICO_TAX_TABLE_ANUAL_2025).unwrap();
//! assert_eq!(bracket.rate, dec!(0.01));
//!
//! let bracket = resolve_bracket(dec!(300000.01), RESICO_TAX_TABLE_ANUAL_2025).unwrap();
//! assert_eq!(bracket.rate, dec!(0.011));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::trace;

use crate::models::Bracket;

/// Errors returned by [`resolve_bracket`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    #[error("bracket table is empty")]
    EmptyTable,

    #[error("amount {0} is negative")]
    InvalidAmount(Decimal),

    /// The amount is below the first bracket or above the last one.
    #[error("no bracket contains amount {0}")]
    NoMatchingBracket(Decimal),
}

/// Errors returned by [`validate_table`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table has no brackets")]
    Empty,

    #[error("bracket {index} has min greater than max")]
    InvertedBounds { index: usize },

    #[error("bracket {index} overlaps or is out of order with the previous bracket")]
    Overlap { index: usize },

    #[error("bracket {index} has rate {rate} outside [0, 1]")]
    InvalidRate { index: usize, rate: Decimal },
}

/// Finds the bracket containing `amount`.
///
/// # Errors
///
/// - [`BracketError::EmptyTable`] when `table` has no brackets
/// - [`BracketError::InvalidAmount`] for negative amounts
/// - [`BracketError::NoMatchingBracket`] when the amount is below the first
///   bracket or above the last one; amounts are never clamped
pub fn resolve_bracket<B: Bracket>(
    amount: Decimal,
    table: &[B],
) -> Result<&B, BracketError> {
    if table.is_empty() {
        return Err(BracketError::EmptyTable);
    }
    if amount < Decimal::ZERO {
        return Err(BracketError::InvalidAmount(amount));
    }

    // Last bracket whose lower bound has been reached.
    let index = table
        .iter()
        .rposition(|bracket| amount >= bracket.min())
        .ok_or(BracketError::NoMatchingBracket(amount))?;
    let bracket = &table[index];

    if amount <= bracket.max() {
        trace!(amount = %amount, index, "bracket resolved");
        return Ok(bracket);
    }

    // Past this bracket's max: only a gap before the next bracket resolves here.
    match table.get(index + 1) {
        Some(next) if amount < next.min() => {
            trace!(amount = %amount, index, "amount in gap, using lower bracket");
            Ok(bracket)
        }
        _ => Err(BracketError::NoMatchingBracket(amount)),
    }
}

/// Checks that a table is non-empty, ordered and non-overlapping, with
/// `min <= max` and a rate in `[0, 1]` for every bracket.
pub fn validate_table<B: Bracket>(table: &[B]) -> Result<(), TableError> {
    if table.is_empty() {
        return Err(TableError::Empty);
    }

    for (index, bracket) in table.iter().enumerate() {
        if bracket.min() > bracket.max() {
            return Err(TableError::InvertedBounds { index });
        }
        let rate = bracket.rate();
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(TableError::InvalidRate { index, rate });
        }
        if index > 0 && bracket.min() <= table[index - 1].max() {
            return Err(TableError::Overlap { index });
        }
    }

    Ok(())
}
