//! Plexcfg Export - Archive builder for purchase configurations
//!
//! Each configuration becomes one `<id>.yml` file holding only the fields of
//! its variant; all files are packed into a single zip archive.
//!
//! # Example
//!
//! ```rust,ignore
//! use plexcfg_core::ConfigStore;
//! use plexcfg_export::Exporter;
//!
//! let store: ConfigStore = load_session();
//! let archive = Exporter::new(store.as_slice()).to_archive()?;
//! std::fs::write(&archive.name, &archive.bytes)?;
//! ```

mod error;
mod exporter;
mod projection;

pub use error::{Error, Result};
pub use exporter::{Archive, Compression, ExportConfig, Exporter};
pub use projection::{project, render};
