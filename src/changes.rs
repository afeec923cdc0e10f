//! Change partition between reference and current image sets.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use tracing::debug;

/// Filename listings per image role directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFiles {
    /// Files in the reference directory.
    pub reference: Vec<String>,
    /// Files in the current directory.
    pub current: Vec<String>,
    /// Files the comparison engine wrote to the difference directory.
    pub difference: Vec<String>,
}

/// Added, deleted, and visually changed files, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    /// In both sets and flagged as changed.
    pub difference: Vec<String>,
    /// In reference only.
    pub deletion: Vec<String>,
    /// In current only.
    pub addition: Vec<String>,
}

impl Changes {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.difference.is_empty() && self.deletion.is_empty() && self.addition.is_empty()
    }

    /// Total rows a comparison report will have.
    pub fn len(&self) -> usize {
        self.difference.len() + self.deletion.len() + self.addition.len()
    }
}

/// Partition the listings.
///
/// Membership is tested against hash sets, so cost is linear in the listing
/// sizes plus the sort.
pub fn compute_changes(files: &ImageFiles) -> Changes {
    let reference: HashSet<&str> = files.reference.iter().map(String::as_str).collect();
    let current: HashSet<&str> = files.current.iter().map(String::as_str).collect();

    let mut difference = files.difference.clone();
    difference.sort();

    let mut deletion: Vec<String> = files
        .reference
        .iter()
        .filter(|f| !current.contains(f.as_str()))
        .cloned()
        .collect();
    deletion.sort();

    let mut addition: Vec<String> = files
        .current
        .iter()
        .filter(|f| !reference.contains(f.as_str()))
        .cloned()
        .collect();
    addition.sort();

    debug!(
        additions = addition.len(),
        deletions = deletion.len(),
        differences = difference.len(),
        "computed change partition"
    );

    Changes {
        difference,
        deletion,
        addition,
    }
}
