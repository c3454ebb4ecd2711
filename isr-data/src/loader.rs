//! CSV loading for custom ISR rate tables.
//!
//! Two layouts are supported, matching the two bracket shapes:
//!
//! | Layout    | Columns                       | Used for |
//! |-----------|-------------------------------|----------|
//! | flat      | `min,max,rate`                | RESICO monthly / annual |
//! | fixed-fee | `min,max,fixed_fee,rate`      | Actividad Empresarial month-1 table |
//!
//! Rates are fractions (`0.011` for 1.1 %). An empty `max` cell marks the
//! open-ended last bracket. Every loaded table is validated before it is
//! returned.
//!
//! ```csv
//! min,max,fixed_fee,rate
//! 0.01,746.04,0.00,0.0192
//! 375975.62,,117912.32,0.35
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use isr_core::calculations::{TableError, validate_table};
use isr_core::{TaxBracket, TaxBracketWithQuota, UNBOUNDED_MAX};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading a bracket table.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot open table file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid table: {0}")]
    InvalidTable(#[from] TableError),
}

impl From<csv::Error> for TableLoadError {
    fn from(err: csv::Error) -> Self {
        TableLoadError::CsvParse(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct FlatBracketRecord {
    min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    max: Option<Decimal>,
    rate: Decimal,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct QuotaBracketRecord {
    min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    max: Option<Decimal>,
    fixed_fee: Decimal,
    rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File, TableLoadError> {
    File::open(path).map_err(|source| TableLoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Loader for bracket tables stored as CSV.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse and validate a flat-rate table (`min,max,rate`).
    pub fn parse_flat<R: Read>(reader: R) -> Result<Vec<TaxBracket>, TableLoadError> {
        let mut brackets = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: FlatBracketRecord = result?;
            brackets.push(TaxBracket {
                min: record.min,
                max: record.max.unwrap_or(UNBOUNDED_MAX),
                rate: record.rate,
            });
        }

        validate_table(&brackets)?;
        debug!(brackets = brackets.len(), "flat table parsed");
        Ok(brackets)
    }

    /// Parse and validate a fixed-fee table (`min,max,fixed_fee,rate`).
    pub fn parse_quota<R: Read>(reader: R) -> Result<Vec<TaxBracketWithQuota>, TableLoadError> {
        let mut brackets = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: QuotaBracketRecord = result?;
            brackets.push(TaxBracketWithQuota {
                min: record.min,
                max: record.max.unwrap_or(UNBOUNDED_MAX),
                fixed_fee: record.fixed_fee,
                rate: record.rate,
            });
        }

        validate_table(&brackets)?;
        debug!(brackets = brackets.len(), "fixed-fee table parsed");
        Ok(brackets)
    }

    pub fn load_flat_file(path: impl AsRef<Path>) -> Result<Vec<TaxBracket>, TableLoadError> {
        let path = path.as_ref();
        let brackets = Self::parse_flat(open(path)?)?;
        info!(path = %path.display(), brackets = brackets.len(), "loaded flat table");
        Ok(brackets)
    }

    pub fn load_quota_file(
        path: impl AsRef<Path>
    ) -> Result<Vec<TaxBracketWithQuota>, TableLoadError> {
        let path = path.as_ref();
        let brackets = Self::parse_quota(open(path)?)?;
        info!(path = %path.display(), brackets = brackets.len(), "loaded fixed-fee table");
        Ok(brackets)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_parse_flat_table() {
        let csv = "min,max,rate\n0.01,300000.00,0.01\n300000.01,600000.00,0.011";

        let brackets = BracketTableLoader::parse_flat(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(brackets.len(), 2);
        assert_eq!(
            brackets[1],
            TaxBracket {
                min: dec!(300000.01),
                max: dec!(600000.00),
                rate: dec!(0.011),
            }
        );
    }

    #[test]
    fn test_parse_quota_empty_max_is_unbounded() {
        let csv = "min,max,fixed_fee,rate\n0.01,746.04,0,0.0192\n746.05,,14.32,0.064";

        let brackets = BracketTableLoader::parse_quota(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(brackets[1].max, UNBOUNDED_MAX);
        assert_eq!(brackets[1].fixed_fee, dec!(14.32));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let csv = "min, max, rate\n 0.01 , 100 , 0.01 ";

        let brackets = BracketTableLoader::parse_flat(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(brackets[0].max, dec!(100));
    }

    #[test]
    fn test_parse_missing_column() {
        let csv = "min,max\n0.01,100";

        let err = BracketTableLoader::parse_flat(csv.as_bytes()).expect_err("Should fail");

        let TableLoadError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_bad_decimal() {
        let csv = "min,max,rate\nabc,100,0.01";

        let err = BracketTableLoader::parse_flat(csv.as_bytes()).expect_err("Should fail");

        assert!(matches!(err, TableLoadError::CsvParse(_)));
    }

    #[test]
    fn test_parse_empty_table_is_invalid() {
        let csv = "min,max,rate\n";

        let err = BracketTableLoader::parse_flat(csv.as_bytes()).expect_err("Should fail");

        assert!(matches!(err, TableLoadError::InvalidTable(TableError::Empty)));
    }

    #[test]
    fn test_parse_overlapping_table_is_invalid() {
        let csv = "min,max,rate\n0.01,100,0.01\n50,200,0.02";

        let err = BracketTableLoader::parse_flat(csv.as_bytes()).expect_err("Should fail");

        assert!(matches!(
            err,
            TableLoadError::InvalidTable(TableError::Overlap { index: 1 })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = BracketTableLoader::load_flat_file("/nonexistent/resico.csv")
            .expect_err("Should fail");

        assert!(matches!(err, TableLoadError::Io { .. }));
    }
}
