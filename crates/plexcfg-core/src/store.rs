//! In-memory session store of purchase configurations

use crate::error::{Error, Result};
use crate::identity::ConfigId;
use crate::model::PurchaseConfiguration;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Store behaviour settings
///
/// # Example
///
/// ```
/// use plexcfg_core::{ConfigStore, PurchaseConfiguration, StoreConfig};
///
/// let mut store = ConfigStore::with_config(StoreConfig::default().enforce_unique_ids(true));
/// store.push(PurchaseConfiguration::product("vip", "VIP")).unwrap();
/// assert!(store.push(PurchaseConfiguration::subscription("vip", "VIP Monthly")).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Reject configurations whose identifier is already present
    ///
    /// Off by default: exported archives then keep only the last
    /// configuration per file name.
    #[serde(default)]
    pub enforce_unique_ids: bool,
}

impl StoreConfig {
    pub fn enforce_unique_ids(mut self, enforce: bool) -> Self {
        self.enforce_unique_ids = enforce;
        self
    }
}

/// Ordered list of configurations authored during one session
///
/// Configurations are appended and removed by position; there is no
/// in-place update.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    configs: Vec<PurchaseConfiguration>,
    config: StoreConfig,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            configs: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Append a configuration
    pub fn push(&mut self, config: PurchaseConfiguration) -> Result<()> {
        self.check_unique(std::slice::from_ref(&config))?;
        debug!(id = %config.id(), kind = %config.kind(), "adding configuration");
        self.configs.push(config);
        Ok(())
    }

    /// Append a batch, preserving its order
    ///
    /// Either the whole batch is added or, on error, nothing is.
    pub fn extend(&mut self, configs: Vec<PurchaseConfiguration>) -> Result<usize> {
        self.check_unique(&configs)?;
        let count = configs.len();
        self.configs.extend(configs);
        debug!(count, total = self.configs.len(), "added configurations");
        Ok(count)
    }

    /// Remove the configuration at `index`
    pub fn remove(&mut self, index: usize) -> Result<PurchaseConfiguration> {
        if index >= self.configs.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.configs.len(),
            });
        }
        let removed = self.configs.remove(index);
        debug!(id = %removed.id(), index, "removed configuration");
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.configs.clear();
    }

    pub fn get(&self, index: usize) -> Option<&PurchaseConfiguration> {
        self.configs.get(index)
    }

    /// First configuration with the given identifier
    pub fn find(&self, id: &str) -> Option<&PurchaseConfiguration> {
        self.configs.iter().find(|c| c.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PurchaseConfiguration> {
        self.configs.iter()
    }

    pub fn as_slice(&self) -> &[PurchaseConfiguration] {
        &self.configs
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Configurations a dependency amount can meaningfully refer to
    pub fn dependency_candidates(&self) -> impl Iterator<Item = &PurchaseConfiguration> {
        self.configs.iter().filter(|c| c.is_repeatable())
    }

    /// Identifiers used by more than one configuration, in first-seen order
    pub fn duplicate_ids(&self) -> Vec<ConfigId> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for config in &self.configs {
            let id = config.id();
            if !seen.insert(id) && !duplicates.contains(id) {
                duplicates.push(id.clone());
            }
        }
        duplicates
    }

    fn check_unique(&self, incoming: &[PurchaseConfiguration]) -> Result<()> {
        if !self.config.enforce_unique_ids {
            return Ok(());
        }
        let mut seen: HashSet<&ConfigId> = self.configs.iter().map(|c| c.id()).collect();
        for config in incoming {
            if !seen.insert(config.id()) {
                return Err(Error::DuplicateId(config.id().to_string()));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ConfigStore {
    type Item = &'a PurchaseConfiguration;
    type IntoIter = std::slice::Iter<'a, PurchaseConfiguration>;

    fn into_iter(self) -> Self::IntoIter {
        self.configs.iter()
    }
}
