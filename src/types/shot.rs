//! Shot item types: one planned capture task each.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Capture mode that produced a shot item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ShotMode {
    /// Stories served by a Histoire build.
    Histoire,
}

impl fmt::Display for ShotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Histoire => write!(f, "histoire"),
        }
    }
}

/// Browser engine a shot is captured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    /// Chromium-based engine.
    Chromium,
    /// Gecko engine.
    Firefox,
    /// WebKit engine.
    Webkit,
}

impl Browser {
    /// Parse browser name from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chromium" | "chrome" => Some(Self::Chromium),
            "firefox" => Some(Self::Firefox),
            "webkit" | "safari" => Some(Self::Webkit),
            _ => None,
        }
    }

    /// Engine name as used in shot labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Firefox => "firefox",
            Self::Webkit => "webkit",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display size a shot is captured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: u32,
}

/// An output path that may be deliberately unavailable.
///
/// Hosted comparison modes keep baselines off the local disk, so baseline
/// and difference paths are `Unsupported` there. Callers must match on this
/// before touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShotPath {
    /// A real filesystem path.
    Path(PathBuf),
    /// Not available in the active comparison mode.
    Unsupported,
}

impl ShotPath {
    /// The path, if this mode supports it.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            Self::Unsupported => None,
        }
    }

    /// Whether the path is available.
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Path(_))
    }
}

/// One planned capture task.
///
/// Created once per planning pass and handed to the capture engine as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotItem {
    /// Unique across the plan: `<storyId>_<variantId><label>`.
    pub id: String,
    /// Human-readable name; file names derive from it.
    pub shot_name: String,
    /// Capture mode.
    pub shot_mode: ShotMode,
    /// Fully resolved target address.
    pub url: String,
    /// Acceptable numeric difference for this shot.
    pub threshold: f64,
    /// Element to wait for before capturing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,
    /// Browser engine, when the plan targets specific browsers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<Browser>,
    /// Responsive breakpoint in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoint: Option<u32>,
    /// Viewport derived from the breakpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    /// Where the baseline image lives.
    pub file_path_baseline: ShotPath,
    /// Where the capture engine writes the current image.
    pub file_path_current: PathBuf,
    /// Where the difference image is written.
    pub file_path_difference: ShotPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_parse() {
        assert_eq!(Browser::from_str("Chrome"), Some(Browser::Chromium));
        assert_eq!(Browser::from_str("webkit"), Some(Browser::Webkit));
        assert_eq!(Browser::from_str("lynx"), None);
    }

    #[test]
    fn test_shot_path_branches() {
        let real = ShotPath::Path(PathBuf::from(".loki/reference/a.png"));
        assert!(real.is_supported());
        assert_eq!(real.as_path(), Some(Path::new(".loki/reference/a.png")));

        assert!(ShotPath::Unsupported.as_path().is_none());
    }

    #[test]
    fn test_shot_path_wire_format() {
        let json = serde_json::to_string(&ShotPath::Unsupported).unwrap();
        assert_eq!(json, "\"unsupported\"");

        let json = serde_json::to_string(&ShotPath::Path(PathBuf::from("a.png"))).unwrap();
        assert_eq!(json, r#"{"path":"a.png"}"#);
    }
}
