//! Structural diff between two resolved rulesets.
//!
//! Each of the four collections is diffed independently over its natural key
//! (slug for quest types and skill domains, name for tiers, source type for
//! sources). The diff is membership-only: two items sharing a key but
//! differing in field values are reported as unchanged. Output lists are
//! sorted, so identical inputs produce identical diffs regardless of
//! collection ordering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Membership diff for one collection, keyed by natural key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDiff {
    /// Present in the draft, absent in the active config
    pub added: Vec<String>,
    /// Present in the active config, absent in the draft
    pub removed: Vec<String>,
    /// Present in both
    pub unchanged: Vec<String>,
}

impl CollectionDiff {
    fn from_keys(draft: BTreeSet<String>, active: BTreeSet<String>) -> Self {
        Self {
            added: draft.difference(&active).cloned().collect(),
            removed: active.difference(&draft).cloned().collect(),
            unchanged: draft.intersection(&active).cloned().collect(),
        }
    }

    /// True when membership is identical.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Structural diff of a draft against the active config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignDiff {
    /// Quest types by slug
    pub quest_types: CollectionDiff,
    /// Skill domains by slug
    pub skill_domains: CollectionDiff,
    /// Recognition tiers by name
    pub recognition_tiers: CollectionDiff,
    /// Recognition sources by source type
    pub recognition_sources: CollectionDiff,
}

impl DesignDiff {
    /// True when no collection changed membership.
    pub fn is_empty(&self) -> bool {
        self.quest_types.is_empty()
            && self.skill_domains.is_empty()
            && self.recognition_tiers.is_empty()
            && self.recognition_sources.is_empty()
    }
}

/// Compute the structural diff between a draft and the active config.
///
/// Pure and deterministic.
pub fn diff(draft: &GameConfig, active: &GameConfig) -> DesignDiff {
    DesignDiff {
        quest_types: CollectionDiff::from_keys(
            draft.quest_types.iter().map(|qt| qt.slug.clone()).collect(),
            active.quest_types.iter().map(|qt| qt.slug.clone()).collect(),
        ),
        skill_domains: CollectionDiff::from_keys(
            draft.skill_domains.iter().map(|sd| sd.slug.clone()).collect(),
            active.skill_domains.iter().map(|sd| sd.slug.clone()).collect(),
        ),
        recognition_tiers: CollectionDiff::from_keys(
            draft
                .recognition_tiers
                .iter()
                .map(|rt| rt.name.clone())
                .collect(),
            active
                .recognition_tiers
                .iter()
                .map(|rt| rt.name.clone())
                .collect(),
        ),
        recognition_sources: CollectionDiff::from_keys(
            draft
                .recognition_sources
                .iter()
                .map(|rs| rs.source_type.as_str().to_string())
                .collect(),
            active
                .recognition_sources
                .iter()
                .map(|rs| rs.source_type.as_str().to_string())
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_configs_diff_empty() {
        let config = GameConfig::classic();
        let result = diff(&config, &config);
        assert!(result.is_empty());
        assert_eq!(result.quest_types.unchanged.len(), 5);
        assert_eq!(result.skill_domains.unchanged.len(), 7);
    }

    #[test]
    fn test_added_and_removed_are_mirrors() {
        let active = GameConfig::classic();
        let mut draft = GameConfig::classic();
        draft.quest_types.retain(|qt| qt.slug != "inferno");
        let mut tutoring = draft.quest_types[0].clone();
        tutoring.slug = "tutoring".to_string();
        draft.quest_types.push(tutoring);

        let forward = diff(&draft, &active);
        let backward = diff(&active, &draft);

        assert_eq!(forward.quest_types.added, vec!["tutoring".to_string()]);
        assert_eq!(forward.quest_types.removed, vec!["inferno".to_string()]);
        assert_eq!(forward.quest_types.added, backward.quest_types.removed);
        assert_eq!(forward.quest_types.removed, backward.quest_types.added);
    }

    #[test]
    fn test_ordering_independent() {
        let active = GameConfig::classic();
        let mut shuffled = GameConfig::classic();
        shuffled.quest_types.reverse();
        shuffled.skill_domains.reverse();

        assert_eq!(diff(&shuffled, &active), diff(&active, &active));
    }

    #[test]
    fn test_value_change_under_same_key_is_unchanged() {
        let active = GameConfig::classic();
        let mut draft = GameConfig::classic();
        draft.quest_types[0].base_recognition = 999;

        let result = diff(&draft, &active);
        // Membership-only: the value change is not surfaced.
        assert!(result.quest_types.is_empty());
        assert!(result
            .quest_types
            .unchanged
            .contains(&draft.quest_types[0].slug));
    }

    #[test]
    fn test_source_diff_keys_on_source_type() {
        let active = GameConfig::classic();
        let mut draft = GameConfig::classic();
        draft
            .recognition_sources
            .retain(|rs| rs.source_type.as_str() != "endorsement_given");

        let result = diff(&draft, &active);
        assert_eq!(
            result.recognition_sources.removed,
            vec!["endorsement_given".to_string()]
        );
        assert!(result.recognition_sources.added.is_empty());
    }
}
