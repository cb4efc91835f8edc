//! YAML importer

use crate::error::{Error, Result};
use plexcfg_core::normalize;
use plexcfg_core::{ConfigStore, PurchaseConfiguration, Value};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([\]}])").expect("trailing comma pattern compiles"));

/// Strip trailing commas before a closing `]` or `}`
pub fn repair(text: &str) -> Cow<'_, str> {
    TRAILING_COMMA.replace_all(text, "$1")
}

/// Importer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Retry a failed decode once after [`repair`]
    #[serde(default = "default_repair")]
    pub repair: bool,
    /// File extensions picked up by [`Importer::import_directory`]
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_repair() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    vec!["yml".to_string(), "yaml".to_string()]
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            repair: default_repair(),
            extensions: default_extensions(),
        }
    }
}

impl ImportConfig {
    pub fn with_repair(mut self, repair: bool) -> Self {
        self.repair = repair;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// Accepted configurations from one import call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOutcome {
    /// Normalized configurations, in input order
    pub accepted: Vec<PurchaseConfiguration>,
    /// Candidates dropped by the admission gate
    pub rejected: usize,
}

impl ImportOutcome {
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    fn admit(&mut self, candidate: &Value) {
        match normalize::admit(candidate).into_configuration() {
            Some(config) => {
                debug!(id = %config.id(), kind = %config.kind(), "accepted configuration");
                self.accepted.push(config);
            }
            None => {
                debug!(
                    candidate = %candidate,
                    "dropped document without productId or subscriptionId"
                );
                self.rejected += 1;
            }
        }
    }

    fn into_result(self) -> Result<Self> {
        if self.accepted.is_empty() {
            warn!(rejected = self.rejected, "no valid configurations found");
            return Err(Error::EmptyResult {
                rejected: self.rejected,
            });
        }
        info!(
            accepted = self.accepted.len(),
            rejected = self.rejected,
            "imported configurations"
        );
        Ok(self)
    }
}

/// Loader for YAML configuration files
#[derive(Debug, Clone, Default)]
pub struct Importer {
    config: ImportConfig,
}

impl Importer {
    /// Create an importer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ImportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Decode YAML text into a dynamic value
    pub fn decode(&self, text: &str) -> Result<Value> {
        match serde_yaml::from_str::<serde_yaml::Value>(text) {
            Ok(value) => Ok(Value::from(value)),
            Err(err) if self.config.repair => {
                debug!(error = %err, "YAML decode failed, retrying after repair");
                serde_yaml::from_str::<serde_yaml::Value>(&repair(text))
                    .map(Value::from)
                    .map_err(|err| {
                        warn!(error = %err, "YAML decode failed after repair");
                        Error::Decode(Box::new(err))
                    })
            }
            Err(err) => {
                warn!(error = %err, "YAML decode failed");
                Err(Error::Decode(Box::new(err)))
            }
        }
    }

    /// Import configurations from YAML text
    pub fn import_str(&self, text: &str) -> Result<ImportOutcome> {
        debug!(len = text.len(), "importing configuration text");
        let decoded = self.decode(text)?;

        let mut outcome = ImportOutcome::default();
        for candidate in candidates(&decoded) {
            outcome.admit(candidate);
        }
        outcome.into_result()
    }

    /// Import text and append the result to `store`
    ///
    /// The store is left untouched when the import fails.
    pub fn import_into(&self, text: &str, store: &mut ConfigStore) -> Result<usize> {
        let outcome = self.import_str(text)?;
        Ok(store.extend(outcome.accepted)?)
    }

    /// Import a single file
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportOutcome> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration file");
        let content = read_text(path)?;
        self.import_str(&content)
    }

    /// Import every matching file under a directory, recursively
    ///
    /// Files are read in path order. Any undecodable file aborts the whole
    /// call; the empty-result check covers the directory as a whole.
    pub fn import_directory(&self, path: impl AsRef<Path>) -> Result<ImportOutcome> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut files = Vec::new();
        self.collect_files(path, &mut files)?;
        files.sort();
        info!(path = %path.display(), files = files.len(), "found configuration files");

        let mut outcome = ImportOutcome::default();
        for file in &files {
            debug!(path = %file.display(), "loading configuration file");
            let content = read_text(file)?;
            let decoded = self.decode(&content).inspect_err(|_| {
                warn!(path = %file.display(), "failed to parse configuration file");
            })?;
            for candidate in candidates(&decoded) {
                outcome.admit(candidate);
            }
        }
        outcome.into_result()
    }

    fn collect_files(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_path = entry.path();

            if file_path.is_dir() {
                self.collect_files(&file_path, files)?;
            } else if self.config.matches_extension(&file_path) {
                files.push(file_path);
            }
        }
        Ok(())
    }
}

/// Read a file as text; bytes that are not UTF-8 are a decode failure
fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|err| {
        warn!(path = %path.display(), error = %err, "configuration file is not UTF-8");
        Error::Decode(Box::new(err))
    })
}

/// A sequence fans out into its elements; anything else is one candidate
fn candidates(decoded: &Value) -> &[Value] {
    match decoded {
        Value::List(items) => items,
        single => std::slice::from_ref(single),
    }
}
