//! ISR calculators for the supported fiscal regimes.
//!
//! Each calculator borrows a [`TaxTables`](crate::tables::TaxTables) and
//! exposes a simple `calculate` plus an advanced variant that nets
//! withholding and provisional payments against the gross tax.
//!
//! | Regime                | Calculator                | Method |
//! |-----------------------|---------------------------|--------|
//! | RESICO                | [`ResicoCalculator`]      | flat rate per bracket over gross income |
//! | Actividad Empresarial | [`EmpresarialCalculator`] | fixed fee + excess × rate over taxable base |
//! | Persona Moral         | [`MoralCalculator`]       | 30 % over fiscal utility |

pub mod analysis;
pub mod common;
pub mod empresarial;
pub mod moral;
pub mod resico;
pub mod resolver;

pub use empresarial::EmpresarialCalculator;
pub use moral::MoralCalculator;
pub use resico::ResicoCalculator;
pub use resolver::{BracketError, TableError, resolve_bracket, validate_table};
