//! Plexcfg Import - YAML loader for purchase configurations
//!
//! Turns uploaded configuration files into normalized
//! [`PurchaseConfiguration`](plexcfg_core::PurchaseConfiguration)s:
//! - Decodes YAML, with one repair pass for trailing commas
//! - Accepts a single mapping or a sequence of mappings
//! - Drops documents without a product or subscription id
//! - Loads single files or whole directories of `.yml`/`.yaml` files

mod error;
mod importer;

pub use error::{Error, Result};
pub use importer::{repair, ImportConfig, ImportOutcome, Importer};
