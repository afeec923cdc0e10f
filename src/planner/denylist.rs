//! Stories that must never be captured.

use std::collections::BTreeSet;

use regex_lite::Regex;

use crate::config::{ConfigError, PipelineConfig};

/// Exact ids and regex patterns of story ids to skip.
#[derive(Debug, Clone, Default)]
pub struct StoryDenylist {
    ids: BTreeSet<String>,
    patterns: Vec<Regex>,
}

impl StoryDenylist {
    /// Build from exact ids and uncompiled patterns.
    pub fn new<I, P>(ids: I, patterns: P) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let pattern = p.as_ref();
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ids: ids.into_iter().map(Into::into).collect(),
            patterns,
        })
    }

    /// Build from the configured ids and patterns.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        Self::new(config.ignore_story_ids.iter().cloned(), &config.ignore_story_patterns)
    }

    /// Whether a story id is denied.
    pub fn is_denied(&self, story_id: &str) -> bool {
        self.ids.contains(story_id) || self.patterns.iter().any(|re| re.is_match(story_id))
    }

    /// Whether nothing is denied.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_denies_full_config() {
        let denylist = StoryDenylist::from_config(&PipelineConfig::default()).unwrap();
        assert!(denylist.is_denied("full-config"));
        assert!(!denylist.is_denied("full-config-panel"));
    }

    #[test]
    fn test_patterns() {
        let denylist = StoryDenylist::new(Vec::<String>::new(), ["^internal-", "-wip$"]).unwrap();
        assert!(denylist.is_denied("internal-tokens"));
        assert!(denylist.is_denied("button-wip"));
        assert!(!denylist.is_denied("button"));
    }

    #[test]
    fn test_bad_pattern() {
        let err = StoryDenylist::new(Vec::<String>::new(), ["("]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_empty_denylist_allows_everything() {
        let denylist = StoryDenylist::default();
        assert!(denylist.is_empty());
        assert!(!denylist.is_denied("full-config"));
    }
}
