//! Shot planning: stories × variants × breakpoints → capture tasks.
//!
//! ## Algorithm
//!
//! 1. Skip stories whose id is on the denylist
//! 2. Resolve breakpoints (mode list, else global list), dropping repeats
//! 3. For each variant (or the story itself), name it with the naming strategy
//! 4. No breakpoints: one shot per variant; otherwise one per (variant, breakpoint)
//! 5. Label ids, names, and files with breakpoint and browser
//!
//! Ids are `<storyId>_<variantId><label>`, so they stay distinct across the
//! full browsers × breakpoints × variants product even when two shot names
//! happen to collide.

pub mod denylist;
pub mod label;
pub mod naming;
pub mod plan;

pub use denylist::StoryDenylist;
pub use label::generate_label;
pub use naming::{DefaultShotNamer, ShotNamer};
pub use plan::ShotPlan;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::breakpoints::select_breakpoints;
use crate::catalog::sandbox_url;
use crate::config::{ConfigError, PipelineConfig};
use crate::types::{Browser, ShotItem, ShotMode, ShotPath, Story, Viewport};

/// Expands story catalogs into shot plans for the Histoire mode.
pub struct ShotPlanner {
    config: PipelineConfig,
    denylist: StoryDenylist,
    namer: Arc<dyn ShotNamer>,
}

impl ShotPlanner {
    /// Create a planner with the default naming strategy.
    ///
    /// Fails only if a configured denylist pattern does not compile.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        let denylist = StoryDenylist::from_config(&config)?;
        Ok(Self {
            config,
            denylist,
            namer: Arc::new(DefaultShotNamer),
        })
    }

    /// Replace the naming strategy.
    pub fn with_namer<N: ShotNamer + 'static>(mut self, namer: N) -> Self {
        self.namer = Arc::new(namer);
        self
    }

    /// Replace the denylist.
    pub fn with_denylist(mut self, denylist: StoryDenylist) -> Self {
        self.denylist = denylist;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Breakpoints this planner expands over, repeats removed in first-seen order.
    pub fn breakpoints(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        select_breakpoints(
            self.config.breakpoints.as_deref(),
            self.config.histoire_breakpoints(),
        )
        .into_iter()
        .filter(|width| seen.insert(*width))
        .collect()
    }

    /// Plan shots without browser labels.
    pub fn plan(&self, site_url: &str, stories: &[Story]) -> ShotPlan {
        let items = self.expand(site_url, stories, None, false);
        self.finish(items)
    }

    /// Plan shots for each browser in turn.
    ///
    /// With more than one browser every label carries the browser name;
    /// with exactly one the items are tagged with it but unlabeled.
    pub fn plan_for_browsers(&self, site_url: &str, stories: &[Story], browsers: &[Browser]) -> ShotPlan {
        if browsers.is_empty() {
            return self.plan(site_url, stories);
        }
        let labeled = browsers.len() > 1;
        let items = browsers
            .iter()
            .flat_map(|&browser| self.expand(site_url, stories, Some(browser), labeled))
            .collect();
        self.finish(items)
    }

    fn finish(&self, items: Vec<ShotItem>) -> ShotPlan {
        let plan = ShotPlan::new(items);
        let duplicates = plan.duplicate_ids();
        if !duplicates.is_empty() {
            warn!(count = duplicates.len(), ids = ?duplicates, "shot plan contains duplicate ids");
        }
        info!(
            shots = plan.len(),
            plan_id = %plan.plan_id,
            "shot plan ready"
        );
        plan
    }

    fn expand(
        &self,
        site_url: &str,
        stories: &[Story],
        browser: Option<Browser>,
        labeled: bool,
    ) -> Vec<ShotItem> {
        let breakpoints = self.breakpoints();
        let label_browser = if labeled { browser } else { None };

        stories
            .iter()
            .filter(|story| {
                let denied = self.denylist.is_denied(&story.id);
                if denied {
                    debug!(story_id = %story.id, "skipping denied story");
                }
                !denied
            })
            .flat_map(|story| self.expand_story(site_url, story, &breakpoints, browser, label_browser))
            .collect()
    }

    fn expand_story(
        &self,
        site_url: &str,
        story: &Story,
        breakpoints: &[u32],
        browser: Option<Browser>,
        label_browser: Option<Browser>,
    ) -> Vec<ShotItem> {
        let variants = story.effective_variants();
        let mut items = Vec::with_capacity(variants.len() * breakpoints.len().max(1));

        for variant in &variants {
            let base_name = self.namer.shot_name(story, variant, ShotMode::Histoire);
            let url = sandbox_url(site_url, &story.id, &variant.id);
            let id_base = format!("{}_{}", story.id, variant.id);

            if breakpoints.is_empty() {
                let label = generate_label(None, label_browser);
                items.push(self.shot_item(&id_base, &base_name, &label, &url, None, browser));
            } else {
                for &width in breakpoints {
                    let label = generate_label(Some(width), label_browser);
                    items.push(self.shot_item(&id_base, &base_name, &label, &url, Some(width), browser));
                }
            }
        }

        debug!(
            story_id = %story.id,
            variants = variants.len(),
            shots = items.len(),
            "expanded story"
        );
        items
    }

    fn shot_item(
        &self,
        id_base: &str,
        base_name: &str,
        label: &str,
        url: &str,
        breakpoint: Option<u32>,
        browser: Option<Browser>,
    ) -> ShotItem {
        let file_name = format!("{}{}.png", base_name, label);
        let paths = &self.config.image_paths;
        let local_only = |dir: PathBuf| {
            if self.config.comparison_mode.supports_baseline() {
                ShotPath::Path(dir.join(&file_name))
            } else {
                ShotPath::Unsupported
            }
        };

        ShotItem {
            id: format!("{}{}", id_base, label),
            shot_name: format!("{}{}", base_name, label),
            shot_mode: ShotMode::Histoire,
            url: url.to_string(),
            threshold: self.config.threshold,
            wait_for_selector: self.config.histoire_wait_for_selector().map(str::to_string),
            browser,
            breakpoint,
            viewport: breakpoint.map(|width| Viewport { width }),
            file_path_baseline: local_only(paths.reference_dir()),
            file_path_current: paths.current_dir().join(&file_name),
            file_path_difference: local_only(paths.difference_dir()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComparisonMode, HistoireShotsConfig};
    use crate::types::Variant;

    const SITE: &str = "http://localhost:6006";

    fn button() -> Story {
        Story::new("Button", "Button").with_variants(vec![
            Variant::new("Button-0", "primary"),
            Variant::new("Button-1", "secondary"),
        ])
    }

    fn planner_with(config: PipelineConfig) -> ShotPlanner {
        ShotPlanner::new(config).unwrap()
    }

    #[test]
    fn test_story_without_variants_or_breakpoints_yields_one_shot() {
        let planner = planner_with(PipelineConfig::default());
        let plan = planner.plan(SITE, &[Story::new("Card", "Card")]);

        assert_eq!(plan.len(), 1);
        let item = &plan.items[0];
        assert_eq!(item.id, "Card_Card");
        assert_eq!(item.shot_name, "Card_Card");
        assert_eq!(item.breakpoint, None);
        assert_eq!(item.viewport, None);
        assert_eq!(item.file_path_current, PathBuf::from(".loki/current/Card_Card.png"));
        assert_eq!(
            item.file_path_baseline,
            ShotPath::Path(PathBuf::from(".loki/reference/Card_Card.png"))
        );
        assert_eq!(item.url, "http://localhost:6006/__sandbox.html?storyId=Card&variantId=Card");
    }

    #[test]
    fn test_variants_times_breakpoints() {
        let mut config = PipelineConfig::default();
        config.breakpoints = Some(vec![320, 768]);
        let plan = planner_with(config).plan(SITE, &[button()]);

        assert_eq!(plan.len(), 4);
        let ids: Vec<_> = plan.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "Button_Button-0__w320px",
                "Button_Button-0__w768px",
                "Button_Button-1__w320px",
                "Button_Button-1__w768px",
            ]
        );
        for item in &plan.items {
            assert_eq!(item.viewport.map(|v| v.width), item.breakpoint);
        }
        assert_eq!(plan.items[3].shot_name, "Button_secondary__w768px");
    }

    #[test]
    fn test_mode_breakpoints_override_global() {
        let mut config = PipelineConfig::default();
        config.breakpoints = Some(vec![320, 768]);
        config.histoire_shots = Some(HistoireShotsConfig {
            histoire_url: SITE.to_string(),
            breakpoints: Some(vec![1024]),
            wait_for_selector: Some("#app".to_string()),
        });
        let plan = planner_with(config).plan(SITE, &[button()]);

        assert_eq!(plan.len(), 2);
        assert!(plan.items.iter().all(|i| i.breakpoint == Some(1024)));
        assert!(plan.items.iter().all(|i| i.wait_for_selector.as_deref() == Some("#app")));
    }

    #[test]
    fn test_repeated_breakpoints_plan_once() {
        let mut config = PipelineConfig::default();
        config.histoire_shots = Some(HistoireShotsConfig {
            histoire_url: SITE.to_string(),
            breakpoints: Some(vec![768, 320, 768, 320]),
            wait_for_selector: None,
        });
        let planner = planner_with(config);
        assert_eq!(planner.breakpoints(), vec![768, 320]);

        let plan = planner.plan(SITE, &[Story::new("Button", "Button")]);
        let ids: Vec<_> = plan.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["Button_Button__w768px", "Button_Button__w320px"]);
        assert!(plan.duplicate_ids().is_empty());
    }

    #[test]
    fn test_underscore_ids_can_alias_and_are_reported() {
        let stories = vec![
            Story::new("a_b", "A").with_variants(vec![Variant::new("c", "one")]),
            Story::new("a", "A").with_variants(vec![Variant::new("b_c", "two")]),
        ];
        let plan = planner_with(PipelineConfig::default()).plan(SITE, &stories);

        // Both items are kept; the collision is only reported.
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.duplicate_ids(), vec!["a_b_c".to_string()]);
    }

    #[test]
    fn test_platform_mode_marks_local_paths_unsupported() {
        let mut config = PipelineConfig::default();
        config.comparison_mode = ComparisonMode::Platform;
        let plan = planner_with(config).plan(SITE, &[button()]);

        for item in &plan.items {
            assert_eq!(item.file_path_baseline, ShotPath::Unsupported);
            assert_eq!(item.file_path_difference, ShotPath::Unsupported);
            assert!(item.file_path_current.starts_with(".loki/current"));
        }
    }

    #[test]
    fn test_full_config_is_never_planned() {
        let planner = planner_with(PipelineConfig::default());
        let stories = vec![Story::new("full-config", "Config"), button()];
        let plan = planner.plan(SITE, &stories);

        assert_eq!(plan.len(), 2);
        assert!(plan.items.iter().all(|i| !i.id.starts_with("full-config")));
    }

    #[test]
    fn test_custom_denylist_allows_full_config() {
        let planner = planner_with(PipelineConfig::default())
            .with_denylist(StoryDenylist::default());
        let plan = planner.plan(SITE, &[Story::new("full-config", "Config")]);
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_custom_namer() {
        let planner = planner_with(PipelineConfig::default())
            .with_namer(|_: &Story, variant: &Variant, _: ShotMode| format!("custom-{}", variant.id));
        let plan = planner.plan(SITE, &[button()]);

        assert_eq!(plan.items[0].shot_name, "custom-Button-0");
        assert_eq!(plan.items[0].file_path_current, PathBuf::from(".loki/current/custom-Button-0.png"));
        // Ids do not depend on the naming strategy.
        assert_eq!(plan.items[0].id, "Button_Button-0");
    }

    #[test]
    fn test_name_collisions_never_collide_ids() {
        let planner = planner_with(PipelineConfig::default())
            .with_namer(|_: &Story, _: &Variant, _: ShotMode| "same".to_string());
        let plan = planner.plan(SITE, &[button(), Story::new("Card", "Card")]);

        let ids: HashSet<_> = plan.items.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), plan.len());
        assert!(plan.duplicate_ids().is_empty());
    }

    #[test]
    fn test_multiple_browsers_label_every_shot() {
        let mut config = PipelineConfig::default();
        config.breakpoints = Some(vec![320, 768]);
        let plan = planner_with(config).plan_for_browsers(
            SITE,
            &[button()],
            &[Browser::Chromium, Browser::Firefox],
        );

        assert_eq!(plan.len(), 8);
        assert!(plan.duplicate_ids().is_empty());
        assert_eq!(plan.items[0].id, "Button_Button-0__w320px__chromium");
        assert_eq!(plan.items[7].id, "Button_Button-1__w768px__firefox");
        assert_eq!(plan.items[7].browser, Some(Browser::Firefox));
    }

    #[test]
    fn test_single_browser_is_unlabeled() {
        let plan = planner_with(PipelineConfig::default()).plan_for_browsers(
            SITE,
            &[button()],
            &[Browser::Webkit],
        );

        assert_eq!(plan.items[0].id, "Button_Button-0");
        assert_eq!(plan.items[0].browser, Some(Browser::Webkit));
    }

    #[test]
    fn test_plan_id_is_deterministic() {
        let mut config = PipelineConfig::default();
        config.breakpoints = Some(vec![320]);
        let planner = planner_with(config);

        let a = planner.plan(SITE, &[button()]);
        let b = planner.plan(SITE, &[button()]);
        assert_eq!(a.plan_id, b.plan_id);

        let c = planner.plan("http://other:6006", &[button()]);
        assert_ne!(a.plan_id, c.plan_id);
    }
}
