//! Error types for plexcfg-import

use thiserror::Error;

/// Import error type
///
/// Every variant aborts the whole import: nothing from a failed call is
/// added to a store.
#[derive(Error, Debug)]
pub enum Error {
    /// Text is not valid YAML, even after the repair pass, or a file is not UTF-8
    #[error("Invalid file format. Please use a valid YAML file.")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Decoding worked but no document had a product or subscription id
    #[error("No valid configurations found in the file.")]
    EmptyResult { rejected: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] plexcfg_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
