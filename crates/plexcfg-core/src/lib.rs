//! Plexcfg Core - Purchase configuration model for Plex Purchases
//!
//! This crate provides the types shared by the import and export pipelines:
//! - Purchase configurations (`PurchaseConfiguration`) with an explicit
//!   product/subscription `Variant`
//! - Dynamic document values (`Value`, `ValueMap`) for decoded YAML
//! - The normalizer that admits and back-fills untyped documents
//! - Builder-side validation for interactively authored configurations
//! - The display item catalog
//! - The in-memory session store
//!
//! ## Admission and normalization
//!
//! ```
//! use plexcfg_core::{normalize, Value, ValueMap};
//!
//! let mut doc = ValueMap::new();
//! doc.insert("productId".to_string(), Value::from("vip_rank"));
//! let doc = Value::Map(doc);
//!
//! assert!(normalize::accepts(&doc));
//! let config = normalize::normalize(&doc);
//! assert_eq!(config.id().as_str(), "vip_rank");
//! assert_eq!(config.dependency_amount, 1);
//! ```

mod builder;
mod catalog;
mod error;
mod identity;
mod model;
pub mod normalize;
mod store;
mod value;

pub use builder::ConfigurationBuilder;
pub use catalog::{Catalog, CatalogItem};
pub use error::{Error, Result};
pub use identity::ConfigId;
pub use model::{
    is_subscription_document, DeliveryType, Kind, ProductDetails, PurchaseActions,
    PurchaseConfiguration, SubscriptionBasis, SubscriptionDetails, Variant,
};
pub use normalize::Admission;
pub use store::{ConfigStore, StoreConfig};
pub use value::{Value, ValueMap};
