use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calculation period. Selects which RESICO table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[serde(alias = "mensual")]
    Monthly,
    #[default]
    #[serde(alias = "anual")]
    Annual,
}

impl Period {
    /// Spanish label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monthly => "mensual",
            Self::Annual => "anual",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown period '{0}' (expected mensual or anual)")]
pub struct ParsePeriodError(String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mensual" | "monthly" | "m" => Ok(Self::Monthly),
            "anual" | "annual" | "a" => Ok(Self::Annual),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Returned when a month number falls outside 1..=12.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("month must be between 1 and 12, got {0}")]
pub struct InvalidMonth(pub u8);

/// Cumulative month number of the fiscal year (1 = January ... 12 = December).
///
/// Defaults to December, the month whose table covers the whole year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    pub const JANUARY: Month = Month(1);
    pub const DECEMBER: Month = Month(12);

    pub fn new(number: u8) -> Result<Self, InvalidMonth> {
        if (1..=12).contains(&number) {
            Ok(Self(number))
        } else {
            Err(InvalidMonth(number))
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[usize::from(self.0 - 1)]
    }

    /// All twelve months in order.
    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12).map(Month)
    }
}

impl Default for Month {
    fn default() -> Self {
        Self::DECEMBER
    }
}

impl TryFrom<u8> for Month {
    type Error = InvalidMonth;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl fmt::Display for Month {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn month_rejects_out_of_range() {
        assert_eq!(Month::new(0), Err(InvalidMonth(0)));
        assert_eq!(Month::new(13), Err(InvalidMonth(13)));
    }

    #[test]
    fn month_defaults_to_december() {
        assert_eq!(Month::default().number(), 12);
        assert_eq!(Month::default().name(), "Diciembre");
    }

    #[test]
    fn month_all_yields_twelve_in_order() {
        let numbers: Vec<u8> = Month::all().map(|m| m.number()).collect();

        assert_eq!(numbers, (1..=12).collect::<Vec<u8>>());
    }

    #[test]
    fn period_parses_spanish_and_english() {
        assert_eq!("mensual".parse::<Period>(), Ok(Period::Monthly));
        assert_eq!("Annual".parse::<Period>(), Ok(Period::Annual));
        assert!("semanal".parse::<Period>().is_err());
    }

    #[test]
    fn period_defaults_to_annual() {
        assert_eq!(Period::default(), Period::Annual);
        assert_eq!(Period::Monthly.to_string(), "mensual");
    }
}
