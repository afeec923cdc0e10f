//! Image directory listings.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::changes::ImageFiles;
use crate::config::ImagePaths;

/// Extension of captured images.
pub const IMAGE_EXTENSION: &str = ".png";

/// Error type for directory listings.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    /// Directory could not be read.
    #[error("Failed to list {path}: {source}")]
    Io {
        /// Directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// File names of the `.png` images directly inside `dir`, sorted.
pub fn list_images(dir: &Path) -> Result<Vec<String>, ListingError> {
    let io_err = |source| ListingError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(IMAGE_EXTENSION) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// List all three role directories, treating unreadable ones as empty.
///
/// A missing difference directory is normal when nothing changed, so each
/// failure is logged and degraded rather than aborting.
pub fn read_image_files(paths: &ImagePaths) -> ImageFiles {
    let lossy = |dir: PathBuf| match list_images(&dir) {
        Ok(names) => names,
        Err(e) => {
            warn!(error = %e, "image directory unavailable, treating as empty");
            Vec::new()
        }
    };

    ImageFiles {
        reference: lossy(paths.reference_dir()),
        current: lossy(paths.current_dir()),
        difference: lossy(paths.difference_dir()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_lists_only_png_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.png", "notes.txt", "c.png.bak"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        assert_eq!(list_images(dir.path()).unwrap(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_images(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_read_image_files_degrades_missing_dirs() {
        let root = tempfile::tempdir().unwrap();
        let paths = ImagePaths {
            base: root.path().to_path_buf(),
            ..ImagePaths::default()
        };
        fs::create_dir_all(paths.current_dir()).unwrap();
        fs::write(paths.current_dir().join("new.png"), b"").unwrap();

        let files = read_image_files(&paths);
        assert!(files.reference.is_empty());
        assert_eq!(files.current, vec!["new.png"]);
        assert!(files.difference.is_empty());
    }
}
