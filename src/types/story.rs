//! Story catalog types.
//!
//! A catalog is a flat list of stories, each with an optional flat list of
//! variants. Variants never carry variants of their own, so the tree is
//! always exactly two levels deep.

use serde::{Deserialize, Serialize};

/// Layout metadata reported by the story tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryLayout {
    /// Layout kind (e.g. "single", "grid").
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Declared layout width, as the story tool reports it.
    #[serde(default)]
    pub width: String,
}

/// A named sub-configuration of a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Variant identifier, unique within its story.
    pub id: String,
    /// Human-readable variant title.
    pub title: String,
}

impl Variant {
    /// Create a new variant.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A capturable unit of UI content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Story identifier, unique within the catalog.
    pub id: String,
    /// Human-readable story title.
    pub title: String,
    /// Optional grouping used by the story tool's navigation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Layout metadata.
    #[serde(default)]
    pub layout: StoryLayout,
    /// Declared variants, in catalog order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<Variant>>,
}

impl Story {
    /// Create a story without variants.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            group: None,
            layout: StoryLayout::default(),
            variants: None,
        }
    }

    /// Attach declared variants.
    pub fn with_variants(mut self, variants: Vec<Variant>) -> Self {
        self.variants = Some(variants);
        self
    }

    /// Set the navigation group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// The expansion units of this story.
    ///
    /// A story without declared variants (absent or empty) is its own single
    /// implicit variant.
    pub fn effective_variants(&self) -> Vec<Variant> {
        match &self.variants {
            Some(variants) if !variants.is_empty() => variants.clone(),
            _ => vec![Variant::new(self.id.clone(), self.title.clone())],
        }
    }
}
