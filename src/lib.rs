//! # shot-manifest
//!
//! Deterministic screenshot planning and comparison manifests for visual
//! regression testing.
//!
//! The crate answers two questions:
//!
//! > Which screenshots must be captured, and where does each one go?
//!
//! > Which images changed, and what does a reviewer see and a storage bucket receive?
//!
//! ## Architecture
//!
//! ```text
//! StoryCatalog → ShotPlanner → ShotPlan ──→ (capture engine)
//!                    ↓                            ↓
//!           select_breakpoints              image directories
//!                                                 ↓
//!                     compute_changes ← ImageFiles
//!                            ↓
//!              ComparisonManifestBuilder → ManifestBundle ──→ (report / upload)
//! ```
//!
//! Browser driving, pixel diffing, and network transfer belong to the
//! caller. Everything here is a pure, synchronous transformation except the
//! `catalog`, `config`, and `listing` edges.
//!
//! ## Determinism Guarantees
//!
//! - Same stories + same config → identical `plan_id`
//! - Change partitions are sorted lexicographically
//! - Same changes + same hosting → identical `manifest_id`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod breakpoints;
pub mod catalog;
pub mod config;
pub mod planner;
pub mod changes;
pub mod manifest;
pub mod listing;
pub mod canonical;

// Re-exports
pub use types::{
    Story, StoryLayout, Variant,
    Browser, ShotItem, ShotMode, ShotPath, Viewport,
    Comparison, ComparisonType, ImageRole, UploadFile, UploadMetadata,
};
pub use breakpoints::select_breakpoints;
pub use catalog::{StoryCatalog, CatalogError, catalog_url, sandbox_url};
pub use config::{
    PipelineConfig, ConfigError, ComparisonMode, ImagePaths,
    HistoireShotsConfig, UploadNamespace,
    DEFAULT_PROJECT_ID, DEFAULT_BUILD_ID, FULL_CONFIG_STORY_ID,
};
pub use planner::{
    ShotPlanner, ShotPlan, ShotNamer, DefaultShotNamer, StoryDenylist, generate_label,
};
pub use changes::{ImageFiles, Changes, compute_changes};
pub use manifest::{
    ComparisonManifestBuilder, ManifestBundle, ManifestStats,
    extend_file_name, strip_role,
};
pub use listing::{list_images, read_image_files, ListingError};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

/// Schema version of plans and manifests.
/// Increment on breaking changes to any serialized type.
pub const MANIFEST_SCHEMA_VERSION: &str = "1.0.0";
