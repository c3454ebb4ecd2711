//! Mexican income tax (ISR) calculations for RESICO, Actividad Empresarial
//! and Persona Moral taxpayers.
//!
//! The crate is pure computation: rate tables, bracket lookup, one
//! calculator per regime and display formatting. Loading tables from files
//! lives in `isr-data`.

pub mod calculations;
pub mod context;
pub mod format;
pub mod models;
pub mod tables;

pub use calculations::{BracketError, TableError};
pub use context::{CalculationRequest, CalculatorContext, ContextError};
pub use models::*;
pub use tables::TaxTables;
