//! Display item catalog
//!
//! The bundled item list lives in `data/items.ron`. Configurations reference
//! items by id; only the builder checks membership.

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const BUILTIN_ITEMS: &str = include_str!("../data/items.ron");

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    Catalog::from_ron(BUILTIN_ITEMS).expect("bundled item catalog is valid RON")
});

/// A selectable display item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub display_name: String,
    pub image_url: String,
}

impl CatalogItem {
    /// Create an item, deriving its display name and image from the id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: display_name(&id),
            image_url: format!("https://static.minecraftitemids.com/64/{}.png", id.to_lowercase()),
            id,
        }
    }
}

/// `DIAMOND_SWORD` -> `Diamond Sword`
fn display_name(id: &str) -> String {
    id.to_lowercase()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Item catalog sorted by display name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: IndexMap<String, CatalogItem>,
}

impl Catalog {
    /// The catalog bundled with this crate
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Build a catalog from item ids; duplicates are collapsed
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items: IndexMap<String, CatalogItem> = IndexMap::new();
        for id in ids {
            let item = CatalogItem::new(id);
            items.entry(item.id.clone()).or_insert(item);
        }
        items.sort_by(|_, a, _, b| a.display_name.cmp(&b.display_name));
        Self { items }
    }

    /// Load a catalog from a RON string of the form `(items: ["ID", ...])`
    pub fn from_ron(content: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct CatalogFile {
            items: Vec<String>,
        }

        let file: CatalogFile = ron::from_str(content)?;
        Ok(Self::from_ids(file.items))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
