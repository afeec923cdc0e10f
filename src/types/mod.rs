//! Core types for shot planning and comparison manifests.

pub mod story;
pub mod shot;
pub mod comparison;

pub use story::{Story, StoryLayout, Variant};
pub use shot::{Browser, ShotItem, ShotMode, ShotPath, Viewport};
pub use comparison::{Comparison, ComparisonType, ImageRole, UploadFile, UploadMetadata};
