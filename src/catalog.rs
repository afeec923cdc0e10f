//! Story catalog documents.
//!
//! The story tool publishes its catalog as `<site>/histoire.json`. Fetching
//! it is the caller's job; this module parses the fetched body and derives
//! the URLs the planner needs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::Story;

/// Error type for catalog loading and parsing.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("Failed to read story catalog {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document does not match the catalog shape.
    #[error("Invalid story catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A parsed story catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryCatalog {
    /// Stories in catalog order.
    pub stories: Vec<Story>,
}

impl StoryCatalog {
    /// Parse a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a catalog file saved from the story site.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Total number of expansion units (variants, or the story itself).
    pub fn variant_count(&self) -> usize {
        self.stories.iter().map(|s| s.effective_variants().len()).sum()
    }
}

/// Where the story tool publishes its catalog.
pub fn catalog_url(site_url: &str) -> String {
    format!("{}/histoire.json", site_url.trim_end_matches('/'))
}

/// Sandbox page rendering a single variant in isolation.
pub fn sandbox_url(site_url: &str, story_id: &str, variant_id: &str) -> String {
    format!(
        "{}/__sandbox.html?storyId={}&variantId={}",
        site_url.trim_end_matches('/'),
        story_id,
        variant_id
    )
}
