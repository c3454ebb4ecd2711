pub mod batch;
pub mod loader;

pub use batch::{BatchEntry, BatchLoadError};
pub use loader::{BracketTableLoader, TableLoadError};
