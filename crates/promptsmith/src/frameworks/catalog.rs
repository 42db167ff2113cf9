//! Framework definitions loaded from `frameworks.json`.
//!
//! The file is shaped as:
//!
//! ```json
//! { "frameworks": [ { "name": "CoT", "description": "...", "example": "..." } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A single prompt-engineering framework definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkDef {
    pub name: String,
    pub description: String,
    pub example: String,
}

impl FrameworkDef {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            example: example.into(),
        }
    }
}

/// Definitions shipped with the crate.
const BUNDLED_JSON: &str = include_str!("../../frameworks.json");

#[derive(Deserialize)]
struct CatalogFile {
    frameworks: Vec<FrameworkDef>,
}

/// Framework definitions keyed by exact name, in file order.
#[derive(Debug, Clone, Default)]
pub struct FrameworkCatalog {
    defs: Vec<FrameworkDef>,
}

impl FrameworkCatalog {
    /// Build a catalog from definitions. A later duplicate name replaces
    /// the earlier definition in place.
    pub fn from_defs(defs: impl IntoIterator<Item = FrameworkDef>) -> Self {
        let mut catalog = Self::default();
        for def in defs {
            match catalog.defs.iter_mut().find(|d| d.name == def.name) {
                Some(existing) => *existing = def,
                None => catalog.defs.push(def),
            }
        }
        catalog
    }

    /// Parse a catalog from JSON text.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| format!("failed to parse frameworks file: {e}"))?;
        Ok(Self::from_defs(file.frameworks))
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Err(format!("frameworks file not found: {}", path.display()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read frameworks file '{}': {e}", path.display()))?;
        let catalog = Self::from_json(&content)?;
        debug!(
            "Loaded {} framework definition(s) from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The catalog shipped with the crate, covering every framework the
    /// selector can choose.
    pub fn bundled() -> Result<Self, String> {
        Self::from_json(BUNDLED_JSON)
    }

    /// Look up a framework by exact name.
    pub fn get(&self, name: &str) -> Option<&FrameworkDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
