//! Shot naming strategies.
//!
//! Labels for breakpoints and browsers are appended by the planner, so a
//! strategy only names the variant. Any `Fn(&Story, &Variant, ShotMode) -> String`
//! closure is a strategy.

use crate::types::{ShotMode, Story, Variant};

/// Produces the base shot name for a variant.
pub trait ShotNamer: Send + Sync {
    /// Base shot name for `variant` of `story` (the story itself when it
    /// declares no variants).
    fn shot_name(&self, story: &Story, variant: &Variant, mode: ShotMode) -> String;
}

/// `<storyId>_<variantTitle>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultShotNamer;

impl ShotNamer for DefaultShotNamer {
    fn shot_name(&self, story: &Story, variant: &Variant, _mode: ShotMode) -> String {
        format!("{}_{}", story.id, variant.title)
    }
}

impl<F> ShotNamer for F
where
    F: Fn(&Story, &Variant, ShotMode) -> String + Send + Sync,
{
    fn shot_name(&self, story: &Story, variant: &Variant, mode: ShotMode) -> String {
        self(story, variant, mode)
    }
}
