//! Comparison report and upload artifact types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonType {
    /// Present in current only.
    Addition,
    /// Present in reference only.
    Deletion,
    /// Present in both and flagged as visually changed.
    Difference,
}

impl fmt::Display for ComparisonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addition => write!(f, "ADDITION"),
            Self::Deletion => write!(f, "DELETION"),
            Self::Difference => write!(f, "DIFFERENCE"),
        }
    }
}

/// Role an image plays in a comparison; doubles as the filename token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    /// Reference image.
    Before,
    /// Current image.
    After,
    /// Difference image.
    Difference,
}

impl ImageRole {
    /// Token inserted into role-suffixed filenames.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Difference => "difference",
        }
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One row of the human-facing comparison report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    /// Change classification.
    #[serde(rename = "type")]
    pub kind: ComparisonType,
    /// Canonical on-disk path of the image.
    pub path: String,
    /// Hosted reference image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_image_url: Option<String>,
    /// Hosted current image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_image_url: Option<String>,
    /// Hosted difference image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference_image_url: Option<String>,
}

/// Storage metadata attached to an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMetadata {
    /// MIME type of the artifact.
    #[serde(rename = "content-type")]
    pub content_type: String,
    /// Storage access policy.
    #[serde(rename = "x-amz-acl")]
    pub acl: String,
    /// Comparison the artifact belongs to.
    #[serde(rename = "type")]
    pub kind: ComparisonType,
    /// Normalized source path.
    pub original: String,
}

/// A self-contained artifact upload task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFile {
    /// Local source path.
    pub file_path: String,
    /// Destination key: `<projectId>/<buildId>/<suffixedName>`.
    pub upload_path: String,
    /// Storage metadata.
    pub meta_data: UploadMetadata,
}
