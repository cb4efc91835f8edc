//! Error types for plexcfg-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid identifier '{0}': use lowercase letters, digits, '_' or '-'")]
    InvalidId(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    #[error("Dependency amount must be at least 1")]
    InvalidDependencyAmount,

    #[error("Unknown display item: {0}")]
    UnknownDisplayItem(String),

    #[error("Unknown dependency: {0}")]
    UnknownDependency(String),

    #[error("Duplicate configuration identifier: {0}")]
    DuplicateId(String),

    #[error("No configuration at position {index} (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Catalog parse error: {0}")]
    Catalog(#[from] ron::error::SpannedError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
