//! Pipeline configuration.
//!
//! Loaded from a JSON document (every field optional) and then overridden by
//! environment variables. Empty values count as unset:
//!
//! - `IMAGE_PATH_BASE`: prefix for all image directories (default: empty)
//! - `IMAGE_PATH_REFERENCE`: reference/baseline directory (default: `.loki/reference/`)
//! - `IMAGE_PATH_CURRENT`: current capture directory (default: `.loki/current/`)
//! - `IMAGE_PATH_DIFFERENCE`: difference output directory (default: `.loki/difference/`)
//! - `LOST_PIXEL_PROJECT_ID`: upload namespace project (default: `none`);
//!   `PROJECT_ID` is read when it is unset
//! - `CI_BUILD_ID`: upload namespace build (default: `1`)
//! - `SHOT_THRESHOLD`: acceptable difference per shot (default: 0)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::canonical::canonical_hash_hex;

/// Default reference image directory.
pub const DEFAULT_REFERENCE_DIR: &str = ".loki/reference/";
/// Default current image directory.
pub const DEFAULT_CURRENT_DIR: &str = ".loki/current/";
/// Default difference image directory.
pub const DEFAULT_DIFFERENCE_DIR: &str = ".loki/difference/";
/// Upload project segment used when no project id is configured.
pub const DEFAULT_PROJECT_ID: &str = "none";
/// Upload build segment used when no build id is configured.
pub const DEFAULT_BUILD_ID: &str = "1";
/// Pseudo-story the story tool uses to expose its own configuration.
pub const FULL_CONFIG_STORY_ID: &str = "full-config";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Config document is not valid JSON for this shape.
    #[error("Invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
    /// A story denylist pattern does not compile.
    #[error("Invalid story pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Compile error.
        #[source]
        source: regex_lite::Error,
    },
    /// An environment override could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
    /// Threshold is negative or not finite.
    #[error("Threshold must be a finite non-negative number, got {0}")]
    InvalidThreshold(f64),
}

/// Whether baselines are compared locally or by a hosted platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// Baselines live on disk next to current captures.
    #[default]
    Local,
    /// Baselines live on a hosted platform; no local baseline or difference paths.
    Platform,
}

impl ComparisonMode {
    /// Whether local baseline comparison is available.
    pub fn supports_baseline(&self) -> bool {
        matches!(self, Self::Local)
    }
}

/// Image directories, relative to a common base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagePaths {
    /// Prefix joined onto every directory.
    pub base: PathBuf,
    /// Reference (baseline) directory.
    pub reference: PathBuf,
    /// Current capture directory.
    pub current: PathBuf,
    /// Difference output directory.
    pub difference: PathBuf,
}

impl ImagePaths {
    /// Resolved reference directory.
    pub fn reference_dir(&self) -> PathBuf {
        self.base.join(&self.reference)
    }

    /// Resolved current directory.
    pub fn current_dir(&self) -> PathBuf {
        self.base.join(&self.current)
    }

    /// Resolved difference directory.
    pub fn difference_dir(&self) -> PathBuf {
        self.base.join(&self.difference)
    }
}

impl Default for ImagePaths {
    fn default() -> Self {
        Self {
            base: PathBuf::new(),
            reference: PathBuf::from(DEFAULT_REFERENCE_DIR),
            current: PathBuf::from(DEFAULT_CURRENT_DIR),
            difference: PathBuf::from(DEFAULT_DIFFERENCE_DIR),
        }
    }
}

/// Settings for the Histoire capture mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoireShotsConfig {
    /// Base URL (or build directory) of the Histoire site.
    pub histoire_url: String,
    /// Breakpoints overriding the global list for this mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Vec<u32>>,
    /// Element to wait for before each capture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,
}

/// Namespace for uploaded artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadNamespace {
    /// Project identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// CI build identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
}

impl UploadNamespace {
    /// Create a namespace with both identifiers set.
    pub fn new(project_id: impl Into<String>, build_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            build_id: Some(build_id.into()),
        }
    }

    /// Project segment, `none` when unset.
    pub fn project_id(&self) -> &str {
        self.project_id.as_deref().unwrap_or(DEFAULT_PROJECT_ID)
    }

    /// Build segment, `1` when unset.
    pub fn build_id(&self) -> &str {
        self.build_id.as_deref().unwrap_or(DEFAULT_BUILD_ID)
    }

    /// Destination key for an uploaded file.
    pub fn upload_path(&self, file_name: &str) -> String {
        format!("{}/{}/{}", self.project_id(), self.build_id(), file_name)
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// Image directories.
    pub image_paths: ImagePaths,
    /// Global breakpoints; absent or empty means default viewport only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Vec<u32>>,
    /// Acceptable numeric difference per shot.
    pub threshold: f64,
    /// Where baselines are compared.
    pub comparison_mode: ComparisonMode,
    /// Histoire mode settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histoire_shots: Option<HistoireShotsConfig>,
    /// Story ids never captured.
    pub ignore_story_ids: Vec<String>,
    /// Regex patterns of story ids never captured.
    pub ignore_story_patterns: Vec<String>,
    /// Upload namespace.
    pub upload: UploadNamespace,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            image_paths: ImagePaths::default(),
            breakpoints: None,
            threshold: 0.0,
            comparison_mode: ComparisonMode::Local,
            histoire_shots: None,
            ignore_story_ids: vec![FULL_CONFIG_STORY_ID.to_string()],
            ignore_story_patterns: Vec::new(),
            upload: UploadNamespace::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON config document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup("IMAGE_PATH_BASE") {
            self.image_paths.base = PathBuf::from(base);
        }
        let non_empty = |var: &str| lookup(var).filter(|s| !s.is_empty());

        if let Some(dir) = non_empty("IMAGE_PATH_REFERENCE") {
            self.image_paths.reference = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty("IMAGE_PATH_CURRENT") {
            self.image_paths.current = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty("IMAGE_PATH_DIFFERENCE") {
            self.image_paths.difference = PathBuf::from(dir);
        }
        if let Some(project_id) = non_empty("LOST_PIXEL_PROJECT_ID").or_else(|| non_empty("PROJECT_ID")) {
            self.upload.project_id = Some(project_id);
        }
        if let Some(build_id) = non_empty("CI_BUILD_ID") {
            self.upload.build_id = Some(build_id);
        }
        if let Some(raw) = lookup("SHOT_THRESHOLD") {
            self.threshold = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "SHOT_THRESHOLD",
                value: raw.clone(),
            })?;
        }
        self.validate()
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    /// Breakpoints configured for the Histoire mode, if any.
    pub fn histoire_breakpoints(&self) -> Option<&[u32]> {
        self.histoire_shots
            .as_ref()
            .and_then(|h| h.breakpoints.as_deref())
    }

    /// Wait-for-element hint for the Histoire mode.
    pub fn histoire_wait_for_selector(&self) -> Option<&str> {
        self.histoire_shots
            .as_ref()
            .and_then(|h| h.wait_for_selector.as_deref())
    }

    /// Deterministic hash of the configuration.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.image_paths.reference_dir(), PathBuf::from(".loki/reference/"));
        assert_eq!(config.ignore_story_ids, vec!["full-config"]);
        assert!(config.comparison_mode.supports_baseline());
        assert_eq!(config.upload.upload_path("a.png"), "none/1/a.png");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{
                "threshold": 0.0005,
                "comparisonMode": "platform",
                "histoireShots": { "histoireUrl": "./.histoire/dist", "breakpoints": [320, 768] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.threshold, 0.0005);
        assert!(!config.comparison_mode.supports_baseline());
        assert_eq!(config.histoire_breakpoints(), Some(&[320, 768][..]));
        assert_eq!(config.image_paths, ImagePaths::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = PipelineConfig::default();
        config
            .apply_env_from(env(&[
                ("IMAGE_PATH_BASE", "/work"),
                ("IMAGE_PATH_CURRENT", "shots/current/"),
                ("LOST_PIXEL_PROJECT_ID", "proj"),
                ("CI_BUILD_ID", "42"),
                ("SHOT_THRESHOLD", "0.1"),
            ]))
            .unwrap();

        assert_eq!(config.image_paths.current_dir(), PathBuf::from("/work/shots/current/"));
        assert_eq!(config.image_paths.reference_dir(), PathBuf::from("/work/.loki/reference/"));
        assert_eq!(config.upload.upload_path("a.after.png"), "proj/42/a.after.png");
        assert_eq!(config.threshold, 0.1);
    }

    #[test]
    fn test_empty_namespace_env_keeps_defaults() {
        let mut config = PipelineConfig::default();
        config
            .apply_env_from(env(&[("LOST_PIXEL_PROJECT_ID", ""), ("CI_BUILD_ID", "")]))
            .unwrap();
        assert_eq!(config.upload.project_id(), "none");
        assert_eq!(config.upload.build_id(), "1");
    }

    #[test]
    fn test_project_id_falls_back_to_short_name() {
        let mut config = PipelineConfig::default();
        config
            .apply_env_from(env(&[("LOST_PIXEL_PROJECT_ID", ""), ("PROJECT_ID", "legacy")]))
            .unwrap();
        assert_eq!(config.upload.upload_path("a.png"), "legacy/1/a.png");

        let mut config = PipelineConfig::default();
        config
            .apply_env_from(env(&[("LOST_PIXEL_PROJECT_ID", "proj"), ("PROJECT_ID", "legacy")]))
            .unwrap();
        assert_eq!(config.upload.upload_path("a.png"), "proj/1/a.png");
    }

    #[test]
    fn test_empty_image_dirs_keep_defaults() {
        let mut config = PipelineConfig::default();
        config
            .apply_env_from(env(&[
                ("IMAGE_PATH_REFERENCE", ""),
                ("IMAGE_PATH_CURRENT", ""),
                ("IMAGE_PATH_DIFFERENCE", ""),
            ]))
            .unwrap();
        assert_eq!(config.image_paths, ImagePaths::default());
        assert_eq!(config.image_paths.reference_dir(), PathBuf::from(".loki/reference/"));
    }

    #[test]
    fn test_bad_threshold_env() {
        let mut config = PipelineConfig::default();
        let err = config
            .apply_env_from(env(&[("SHOT_THRESHOLD", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "SHOT_THRESHOLD", .. }));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = PipelineConfig::from_json_str(r#"{ "threshold": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold(_)));
    }

    #[test]
    fn test_fingerprint_changes_with_config() {
        let a = PipelineConfig::default();
        let mut b = PipelineConfig::default();
        b.breakpoints = Some(vec![320]);

        assert_eq!(a.fingerprint(), PipelineConfig::default().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
