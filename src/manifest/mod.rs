//! Comparison manifests: what changed, where it is hosted, what to upload.
//!
//! ```text
//! Changes → ComparisonManifestBuilder → (Vec<Comparison>, Vec<UploadFile>) → ManifestBundle
//! ```
//!
//! Given identical changes, base URL, directories, and namespace, the
//! comparison list, upload list, and `manifest_id` are identical.

pub mod builder;
pub mod filename;

pub use builder::{ComparisonManifestBuilder, UPLOAD_ACL, UPLOAD_CONTENT_TYPE};
pub use filename::{extend_file_name, strip_role};

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::types::{Comparison, ComparisonType, UploadFile};
use crate::MANIFEST_SCHEMA_VERSION;

/// Row and upload counts for a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestStats {
    /// Addition rows.
    pub additions: usize,
    /// Deletion rows.
    pub deletions: usize,
    /// Difference rows.
    pub differences: usize,
    /// Upload entries.
    pub uploads: usize,
}

/// Both manifests plus a deterministic identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestBundle {
    /// xxh64 of the canonical comparison and upload lists.
    pub manifest_id: String,
    /// Schema version.
    pub version: String,
    /// Unix timestamp when generated. Not part of `manifest_id`.
    pub generated_at: i64,
    /// Human-facing comparison rows.
    pub comparisons: Vec<Comparison>,
    /// Artifact uploads.
    pub uploads: Vec<UploadFile>,
    /// Summary counts.
    pub stats: ManifestStats,
}

impl ManifestBundle {
    /// Wrap the two lists.
    pub fn new(comparisons: Vec<Comparison>, uploads: Vec<UploadFile>) -> Self {
        let generated_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        let count = |kind: ComparisonType| comparisons.iter().filter(|c| c.kind == kind).count();
        let stats = ManifestStats {
            additions: count(ComparisonType::Addition),
            deletions: count(ComparisonType::Deletion),
            differences: count(ComparisonType::Difference),
            uploads: uploads.len(),
        };

        let manifest_id = canonical_hash_hex(&ManifestIdInput {
            comparisons: &comparisons,
            uploads: &uploads,
        });

        Self {
            manifest_id,
            version: MANIFEST_SCHEMA_VERSION.to_string(),
            generated_at,
            comparisons,
            uploads,
            stats,
        }
    }

    /// Whether there is nothing to review.
    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }
}

/// Internal struct for computing manifest_id.
#[derive(Serialize)]
struct ManifestIdInput<'a> {
    comparisons: &'a [Comparison],
    uploads: &'a [UploadFile],
}
