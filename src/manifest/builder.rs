//! Comparison and upload manifest construction.

use std::path::{Component, Path, PathBuf};

use tracing::info;

use super::filename::extend_file_name;
use super::ManifestBundle;
use crate::changes::Changes;
use crate::config::{ImagePaths, PipelineConfig, UploadNamespace};
use crate::types::{Comparison, ComparisonType, ImageRole, UploadFile, UploadMetadata};

/// MIME type of every uploaded artifact.
pub const UPLOAD_CONTENT_TYPE: &str = "image/png";
/// Access policy of every uploaded artifact.
pub const UPLOAD_ACL: &str = "public-read";

/// Builds the comparison report and upload list for a change partition.
///
/// Output order is additions, deletions, then differences, each in the
/// (sorted) order of the partition.
#[derive(Debug, Clone)]
pub struct ComparisonManifestBuilder {
    base_url: String,
    image_paths: ImagePaths,
    namespace: UploadNamespace,
}

impl ComparisonManifestBuilder {
    /// Create a builder for artifacts hosted under `base_url`.
    pub fn new(base_url: impl Into<String>, image_paths: ImagePaths, namespace: UploadNamespace) -> Self {
        Self {
            base_url: base_url.into(),
            image_paths,
            namespace,
        }
    }

    /// Create a builder from pipeline configuration.
    pub fn from_config(base_url: impl Into<String>, config: &PipelineConfig) -> Self {
        Self::new(base_url, config.image_paths.clone(), config.upload.clone())
    }

    /// Build both manifests and wrap them with an id and stats.
    pub fn build(&self, changes: &Changes) -> ManifestBundle {
        let (comparisons, uploads) = self.prepare_comparison_list(changes);
        let bundle = ManifestBundle::new(comparisons, uploads);

        info!(
            manifest_id = %bundle.manifest_id,
            additions = bundle.stats.additions,
            deletions = bundle.stats.deletions,
            differences = bundle.stats.differences,
            uploads = bundle.stats.uploads,
            "comparison manifest ready"
        );
        bundle
    }

    /// Build the comparison rows and upload entries.
    pub fn prepare_comparison_list(&self, changes: &Changes) -> (Vec<Comparison>, Vec<UploadFile>) {
        let mut comparisons = Vec::with_capacity(changes.len());
        let mut uploads = Vec::with_capacity(
            changes.addition.len() + changes.deletion.len() + 3 * changes.difference.len(),
        );

        let reference_dir = self.image_paths.reference_dir();
        let current_dir = self.image_paths.current_dir();
        let difference_dir = self.image_paths.difference_dir();

        for file_name in &changes.addition {
            let kind = ComparisonType::Addition;
            let after = extend_file_name(file_name, ImageRole::After);

            comparisons.push(Comparison {
                kind,
                path: self.disk_path(file_name),
                before_image_url: None,
                after_image_url: Some(self.url(&after)),
                difference_image_url: None,
            });
            uploads.push(self.upload_item(&after, &current_dir, file_name, kind));
        }

        for file_name in &changes.deletion {
            let kind = ComparisonType::Deletion;
            let before = extend_file_name(file_name, ImageRole::Before);

            comparisons.push(Comparison {
                kind,
                path: self.disk_path(file_name),
                before_image_url: Some(self.url(&before)),
                after_image_url: None,
                difference_image_url: None,
            });
            uploads.push(self.upload_item(&before, &reference_dir, file_name, kind));
        }

        for file_name in &changes.difference {
            let kind = ComparisonType::Difference;
            let before = extend_file_name(file_name, ImageRole::Before);
            let after = extend_file_name(file_name, ImageRole::After);
            let difference = extend_file_name(file_name, ImageRole::Difference);

            comparisons.push(Comparison {
                kind,
                path: self.disk_path(file_name),
                before_image_url: Some(self.url(&before)),
                after_image_url: Some(self.url(&after)),
                difference_image_url: Some(self.url(&difference)),
            });
            uploads.push(self.upload_item(&before, &reference_dir, file_name, kind));
            uploads.push(self.upload_item(&after, &current_dir, file_name, kind));
            uploads.push(self.upload_item(&difference, &difference_dir, file_name, kind));
        }

        (comparisons, uploads)
    }

    fn url(&self, file_name: &str) -> String {
        format!("{}/{}", self.base_url, file_name)
    }

    // Rows always point at the reference location, whatever the change type.
    fn disk_path(&self, file_name: &str) -> String {
        path_string(&normalize(&self.image_paths.reference_dir().join(file_name)))
    }

    fn upload_item(&self, upload_name: &str, dir: &Path, file_name: &str, kind: ComparisonType) -> UploadFile {
        let file_path = path_string(&normalize(&dir.join(file_name)));

        UploadFile {
            upload_path: self.namespace.upload_path(upload_name),
            meta_data: UploadMetadata {
                content_type: UPLOAD_CONTENT_TYPE.to_string(),
                acl: UPLOAD_ACL.to_string(),
                kind,
                original: file_path.clone(),
            },
            file_path,
        }
    }
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
