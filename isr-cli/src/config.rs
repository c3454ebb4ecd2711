//! TOML configuration file.
//!
//! Every section is optional:
//!
//! ```toml
//! log_level = "info"
//! log_file = "isr.log"
//!
//! [calculator]
//! regime = "persona_moral"
//! period = "anual"
//! month = 12
//! utility_coefficient = 0.2360
//!
//! [tables]
//! resico_annual = "tablas/resico_anual.csv"
//! empresarial_monthly = "tablas/empresarial.csv"
//! ```
//!
//! Relative table paths are resolved against the directory holding the
//! config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use isr_core::{CalculatorContext, TaxTables};
use isr_data::BracketTableLoader;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub calculator: CalculatorContext,
    pub tables: TableFiles,
}

/// Overrides for the built-in 2025 tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableFiles {
    /// Flat `min,max,rate` CSV.
    pub resico_monthly: Option<PathBuf>,
    /// Flat `min,max,rate` CSV.
    pub resico_annual: Option<PathBuf>,
    /// Fixed-fee `min,max,fixed_fee,rate` CSV for month 1.
    pub empresarial_monthly: Option<PathBuf>,
    pub resico_max_income: Option<Decimal>,
    pub moral_rate: Option<Decimal>,
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Config = toml::from_str(input).context("invalid configuration")?;
        config
            .calculator
            .validate()
            .context("invalid [calculator] section")?;
        Ok(config)
    }

    /// Reads the config file; relative paths inside it become relative to its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        let mut config = Self::from_toml_str(&contents)
            .with_context(|| format!("in config file '{}'", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.tables.rebase(base);
        config.log_file = config.log_file.map(|file| base.join(file));

        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// The tables to calculate with: built-in 2025 tables with any configured overrides.
    pub fn tax_tables(&self) -> Result<TaxTables> {
        let mut tables = TaxTables::builtin_2025();
        let files = &self.tables;

        if let Some(path) = &files.resico_monthly {
            tables.resico_monthly = BracketTableLoader::load_flat_file(path)
                .with_context(|| format!("loading RESICO monthly table '{}'", path.display()))?;
        }
        if let Some(path) = &files.resico_annual {
            tables.resico_annual = BracketTableLoader::load_flat_file(path)
                .with_context(|| format!("loading RESICO annual table '{}'", path.display()))?;
        }
        if let Some(path) = &files.empresarial_monthly {
            tables.empresarial_monthly = BracketTableLoader::load_quota_file(path).with_context(
                || format!("loading Actividad Empresarial table '{}'", path.display()),
            )?;
        }
        if let Some(limit) = files.resico_max_income {
            tables.resico_max_income = limit;
        }
        if let Some(rate) = files.moral_rate {
            tables.moral_rate = rate;
        }

        tables.validate().context("configured tables are invalid")?;
        debug!("tax tables ready");
        Ok(tables)
    }
}

impl TableFiles {
    fn rebase(
        &mut self,
        base: &Path,
    ) {
        for path in [
            &mut self.resico_monthly,
            &mut self.resico_annual,
            &mut self.empresarial_monthly,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
