//! The output of one planning pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::canonical::canonical_hash_hex;
use crate::types::ShotItem;
use crate::MANIFEST_SCHEMA_VERSION;

/// An ordered capture work queue with a deterministic identity.
///
/// Same stories + same configuration + same naming strategy → same `plan_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotPlan {
    /// xxh64 of the canonical item list.
    pub plan_id: String,
    /// Schema version.
    pub version: String,
    /// Shot items in planning order.
    pub items: Vec<ShotItem>,
}

impl ShotPlan {
    /// Wrap planned items and compute the plan id.
    pub fn new(items: Vec<ShotItem>) -> Self {
        let plan_id = canonical_hash_hex(&items);
        Self {
            plan_id,
            version: MANIFEST_SCHEMA_VERSION.to_string(),
            items,
        }
    }

    /// Number of shots.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids that occur more than once, sorted.
    ///
    /// Ids join story and variant ids with `_`, so they are only guaranteed
    /// distinct when no story or variant id contains `_`, story ids are
    /// unique, and variant ids are unique per story. Story `a_b` with
    /// variant `c` and story `a` with variant `b_c` both yield `a_b_c`;
    /// such collisions are reported here, never dropped.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &self.items {
            *counts.entry(item.id.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id.to_string())
            .collect()
    }

    /// Consume the plan, yielding the items.
    pub fn into_items(self) -> Vec<ShotItem> {
        self.items
    }
}
