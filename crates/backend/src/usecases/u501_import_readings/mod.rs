pub mod executor;
pub mod parser;

use crate::shared::data::StoreError;
use thiserror::Error;

pub use executor::ImportExecutor;
pub use parser::parse_csv;

/// Failures that abort an import before any reading is written
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("An error occurred while parsing the CSV: {0}")]
    Parse(String),

    #[error("CSV file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("CSV file is empty or could not be read.")]
    Empty,

    #[error("Could not load components: {0}")]
    Store(StoreError),
}
