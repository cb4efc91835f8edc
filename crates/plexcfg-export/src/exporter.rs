//! Archive export of configuration collections

use crate::error::Result;
use crate::projection::{project, render};
use indexmap::IndexMap;
use plexcfg_core::PurchaseConfiguration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Compression applied to archive entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Compression {
    /// Store entries as-is
    Stored,
    /// Deflate entries
    #[default]
    Deflated,
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// Exporter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// File name of the produced archive
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
    /// Extension of each configuration file, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub compression: Compression,
}

fn default_archive_name() -> String {
    "plex-purchases-configs.zip".to_string()
}

fn default_extension() -> String {
    "yml".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            archive_name: default_archive_name(),
            extension: default_extension(),
            compression: Compression::default(),
        }
    }
}

impl ExportConfig {
    pub fn with_archive_name(mut self, name: impl Into<String>) -> Self {
        self.archive_name = name.into();
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
}

/// A packaged set of configuration files
#[derive(Debug, Clone)]
pub struct Archive {
    /// Suggested file name of the archive
    pub name: String,
    /// Zip bytes
    pub bytes: Vec<u8>,
    /// Entry names, in archive order
    pub entries: Vec<String>,
}

impl Archive {
    /// Write the archive bytes to `path`
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Exporter for a collection of configurations
pub struct Exporter<'a> {
    configs: &'a [PurchaseConfiguration],
    config: ExportConfig,
}

impl<'a> Exporter<'a> {
    /// Create a new exporter with default settings
    pub fn new(configs: &'a [PurchaseConfiguration]) -> Self {
        Self {
            configs,
            config: ExportConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Archive entry name for one configuration: `<id>.<extension>`
    pub fn file_name(&self, config: &PurchaseConfiguration) -> String {
        format!("{}.{}", config.id(), self.config.extension)
    }

    /// Render every configuration, keyed by file name
    ///
    /// Configurations sharing a file name collapse into one entry: the later
    /// configuration's content wins, the first one's position is kept.
    pub fn documents(&self) -> Result<IndexMap<String, String>> {
        let mut documents = IndexMap::new();
        for config in self.configs {
            let name = self.file_name(config);
            if config.id().is_empty() {
                warn!(kind = %config.kind(), "exporting configuration without an identifier");
            }
            let content = render(&project(config))?;
            debug!(file = %name, kind = %config.kind(), "rendered configuration");
            if documents.insert(name.clone(), content).is_some() {
                warn!(file = %name, "duplicate identifier, earlier configuration overwritten");
            }
        }
        Ok(documents)
    }

    /// Package all configurations into an in-memory zip archive
    pub fn to_archive(&self) -> Result<Archive> {
        let documents = self.documents()?;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in &documents {
            writer.start_file(name.as_str(), self.file_options())?;
            writer.write_all(content.as_bytes())?;
        }
        let bytes = writer.finish()?.into_inner();

        info!(
            configurations = self.configs.len(),
            entries = documents.len(),
            bytes = bytes.len(),
            "exported archive"
        );

        Ok(Archive {
            name: self.config.archive_name.clone(),
            bytes,
            entries: documents.into_keys().collect(),
        })
    }

    /// Build the archive and write it into `dir` under its configured name
    pub fn write_archive(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let archive = self.to_archive()?;
        let path = dir.as_ref().join(&archive.name);
        archive.write_to(&path)?;
        Ok(path)
    }

    fn file_options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(self.config.compression.method())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexcfg_core::{ConfigStore, Kind};
    use plexcfg_import::Importer;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_entries(bytes: &[u8]) -> Vec<(String, String)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut content = String::new();
                file.read_to_string(&mut content).unwrap();
                (file.name().to_string(), content)
            })
            .collect()
    }

    fn session() -> ConfigStore {
        let mut store = ConfigStore::new();
        Importer::new()
            .import_into(
                r#"
- productId: crate_key
  productName: Crate Key
  price: 250
  repeatablePurchase: true
  actions:
    success: ["crate give {player} vote 1"]
  displayItem: TRIPWIRE_HOOK
- subscriptionId: gold
  subscriptionName: Gold Pass
  subscriptionDescription: Monthly gold perks
  price: 4.99
  subscriptionBasis: SEMI_YEARLY
  callbackDelivery: ALLOW_OFFLINE_DELIVERY
  actions:
    success: ["lp user {player} parent add gold"]
    expire: ["lp user {player} parent remove gold"]
    renew: []
  dependency: crate_key
  dependencyAmount: 2
  permission: plex.gold.<purchase_times>
  hideIfNoPermission: true
- productId: starter
  productName: Starter Kit
"#,
                &mut store,
            )
            .unwrap();
        store
    }

    #[test]
    fn test_archive_completeness() {
        let store = session();
        let archive = Exporter::new(store.as_slice()).to_archive().unwrap();

        assert_eq!(archive.name, "plex-purchases-configs.zip");
        assert_eq!(archive.entries, vec!["crate_key.yml", "gold.yml", "starter.yml"]);

        let entries = read_entries(&archive.bytes);
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["crate_key.yml", "gold.yml", "starter.yml"]);

        let gold = &entries[1].1;
        assert!(gold.starts_with("subscriptionId: gold\n"));
        assert!(!gold.contains("productId"));
        assert!(!gold.contains("repeatablePurchase"));
        assert!(!entries[0].1.contains("subscription"));
    }

    #[test]
    fn test_round_trip_through_import() {
        let store = session();
        let archive = Exporter::new(store.as_slice()).to_archive().unwrap();

        let importer = Importer::new();
        for ((_, content), original) in read_entries(&archive.bytes).iter().zip(store.iter()) {
            let outcome = importer.import_str(content).unwrap();
            assert_eq!(outcome.accepted, vec![original.clone()]);
        }
    }

    #[test]
    fn test_unnamed_subscription_reads_back_as_product() {
        let configs = vec![PurchaseConfiguration::subscription("gold", "")];
        let archive = Exporter::new(&configs).to_archive().unwrap();
        let entries = read_entries(&archive.bytes);
        assert_eq!(entries[0].0, "gold.yml");
        assert!(entries[0].1.starts_with("subscriptionId: gold\n"));

        let outcome = Importer::new().import_str(&entries[0].1).unwrap();
        assert_eq!(outcome.accepted[0].kind(), Kind::Product);
        assert!(outcome.accepted[0].id().is_empty());
    }

    #[test]
    fn test_colliding_identifiers_overwrite() {
        let mut store = ConfigStore::new();
        store.push(PurchaseConfiguration::product("vip", "VIP Rank")).unwrap();
        store.push(PurchaseConfiguration::product("key", "Key")).unwrap();
        store.push(PurchaseConfiguration::subscription("vip", "VIP Monthly")).unwrap();

        let archive = Exporter::new(store.as_slice()).to_archive().unwrap();
        assert_eq!(archive.entries, vec!["vip.yml", "key.yml"]);

        let entries = read_entries(&archive.bytes);
        assert_eq!(entries.len(), 2);
        let vip = Importer::new().import_str(&entries[0].1).unwrap();
        assert_eq!(vip.accepted[0].kind(), Kind::Subscription);
        assert_eq!(vip.accepted[0].name(), "VIP Monthly");
    }

    #[test]
    fn test_empty_collection() {
        let archive = Exporter::new(&[]).to_archive().unwrap();
        assert!(archive.entries.is_empty());
        assert!(read_entries(&archive.bytes).is_empty());
    }

    #[test]
    fn test_stored_compression_and_custom_name() {
        let store = session();
        let config = ExportConfig::default()
            .with_archive_name("shop.zip")
            .with_compression(Compression::Stored);
        let exporter = Exporter::new(store.as_slice()).with_config(config);

        let dir = tempfile::tempdir().unwrap();
        let path = exporter.write_archive(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("shop.zip"));

        let bytes = fs::read(&path).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        assert_eq!(archive.len(), 3);
        assert_eq!(
            archive.by_name("starter.yml").unwrap().compression(),
            CompressionMethod::Stored
        );
    }

    #[test]
    fn test_file_name() {
        let configs = [PurchaseConfiguration::subscription("gold", "Gold")];
        let exporter = Exporter::new(&configs);
        assert_eq!(exporter.file_name(&configs[0]), "gold.yml");
    }
}
