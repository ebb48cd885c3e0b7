//! The resolved, read-only ruleset snapshot.
//!
//! [`GameConfig`] is what the rest of the application consumes: XP math,
//! endorsement rewards, and the diff engine all read from it. It is assembled
//! from one design row plus its four child collections, sorted by natural
//! sort keys, and treated as immutable — consumers re-resolve rather than
//! mutate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::types::{
    DesignChildren, GameDesign, QuestType, RecognitionSource, RecognitionTier, RecognitionType,
    SkillDomain, SourceType, ThresholdType, ValidationMethod, VisibilityDefault,
};

/// Resolved ruleset for one community.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Design this snapshot was resolved from
    pub game_design_id: Uuid,
    /// Design name
    pub name: String,
    /// Design description
    pub description: Option<String>,
    /// Community value statement
    pub value_statement: String,
    /// Design rationale
    pub design_rationale: String,
    /// Design version
    pub version: u32,
    /// When this ruleset must be revisited
    pub sunset_at: DateTime<Utc>,
    /// Quest types ordered by sort order
    pub quest_types: Vec<QuestType>,
    /// Skill domains ordered by sort order
    pub skill_domains: Vec<SkillDomain>,
    /// Recognition tiers ordered by tier number
    pub recognition_tiers: Vec<RecognitionTier>,
    /// Recognition sources ordered by source type
    pub recognition_sources: Vec<RecognitionSource>,
    /// True when built from the hard-coded Classic fallback
    pub is_classic_fallback: bool,
}

impl GameConfig {
    /// Assemble a snapshot from a design row and its children.
    pub fn from_parts(design: &GameDesign, children: DesignChildren) -> Self {
        let children = children.sorted();
        Self {
            game_design_id: design.id,
            name: design.name.clone(),
            description: design.description.clone(),
            value_statement: design.value_statement.clone(),
            design_rationale: design.design_rationale.clone(),
            version: design.version,
            sunset_at: design.sunset_at,
            quest_types: children.quest_types,
            skill_domains: children.skill_domains,
            recognition_tiers: children.recognition_tiers,
            recognition_sources: children.recognition_sources,
            is_classic_fallback: false,
        }
    }

    /// Look up a quest type by slug.
    pub fn quest_type(&self, slug: &str) -> Option<&QuestType> {
        self.quest_types.iter().find(|qt| qt.slug == slug)
    }

    /// Look up a skill domain by slug.
    pub fn skill_domain(&self, slug: &str) -> Option<&SkillDomain> {
        self.skill_domains.iter().find(|sd| sd.slug == slug)
    }

    /// Deterministic hash of the snapshot for audit and cache tagging.
    ///
    /// Covers the headline fields and every natural key; identical rulesets
    /// hash identically regardless of row ids or input ordering.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update(self.version.to_le_bytes());
        for qt in &self.quest_types {
            hasher.update(qt.slug.as_bytes());
            hasher.update(qt.base_recognition.to_le_bytes());
        }
        for sd in &self.skill_domains {
            hasher.update(sd.slug.as_bytes());
        }
        for rt in &self.recognition_tiers {
            hasher.update(rt.name.as_bytes());
            hasher.update(rt.threshold_value.to_le_bytes());
        }
        for rs in &self.recognition_sources {
            hasher.update(rs.source_type.as_str().as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// The hard-coded Classic ruleset.
    ///
    /// Used as the fallback when a community has never initialized a game
    /// design: five escalating quest tiers, seven skill domains, five
    /// standing tiers, three recognition sources.
    pub fn classic() -> Self {
        let design_id = Uuid::nil();

        let quest_types = [
            (
                "spark",
                "Spark",
                "Quick, simple tasks like picking up litter or checking on a neighbor",
                ValidationMethod::SelfReport,
                0u32,
                5u32,
                1u32,
            ),
            (
                "ember",
                "Ember",
                "Tasks needing one peer to confirm, like helping someone move a couch",
                ValidationMethod::PeerConfirm,
                1,
                15,
                1,
            ),
            (
                "flame",
                "Flame",
                "Substantial tasks with photo evidence, like repairing a fence",
                ValidationMethod::PhotoAndPeer,
                1,
                35,
                1,
            ),
            (
                "blaze",
                "Blaze",
                "Multi-person efforts requiring 3+ community votes to validate",
                ValidationMethod::CommunityVote,
                3,
                75,
                5,
            ),
            (
                "inferno",
                "Inferno",
                "Major projects spanning weeks with documented outcomes",
                ValidationMethod::CommunityVoteAndEvidence,
                5,
                150,
                5,
            ),
        ]
        .into_iter()
        .enumerate()
        .map(
            |(i, (slug, label, description, method, threshold, base_xp, party))| QuestType {
                id: Uuid::new_v4(),
                game_design_id: design_id,
                slug: slug.to_string(),
                label: label.to_string(),
                description: Some(description.to_string()),
                validation_method: method,
                validation_threshold: threshold,
                recognition_type: RecognitionType::Xp,
                base_recognition: base_xp,
                narrative_prompt: None,
                cooldown_hours: 0,
                max_party_size: party,
                sort_order: i as u32,
                color: None,
                icon: None,
            },
        )
        .collect();

        let skill_domains = [
            ("craft", "Craft", "Building, repairing, and creating physical things"),
            ("green", "Green", "Nurturing growing things and stewarding the environment"),
            ("care", "Care", "Supporting people through presence and attention"),
            ("bridge", "Bridge", "Moving people and things where they need to go"),
            ("signal", "Signal", "Connecting people through information and technology"),
            ("hearth", "Hearth", "Gathering people together through food and fellowship"),
            ("weave", "Weave", "Coordinating people and processes toward shared goals"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (slug, label, description))| SkillDomain {
            id: Uuid::new_v4(),
            game_design_id: design_id,
            slug: slug.to_string(),
            label: label.to_string(),
            description: Some(description.to_string()),
            examples: Vec::new(),
            color: None,
            icon: None,
            visibility_default: VisibilityDefault::Private,
            sort_order: i as u32,
        })
        .collect();

        let recognition_tiers = [
            (1u32, "Newcomer", 0u32, "Browse, post needs, respond, receive help"),
            (2, "Neighbor", 0, "Post offers, create quests, join parties, earn skill XP"),
            (3, "Pillar", 50, "Create guilds, moderate, propose seasonal quests"),
            (4, "Keeper", 200, "Governance council, propose rule changes, mentor"),
            (5, "Founder", 500, "Cross-neighborhood coordination, system governance"),
        ]
        .into_iter()
        .map(|(tier_number, name, threshold, unlock)| RecognitionTier {
            id: Uuid::new_v4(),
            game_design_id: design_id,
            tier_number,
            name: name.to_string(),
            threshold_type: ThresholdType::Points,
            threshold_value: threshold,
            additional_requirements: (tier_number == 3)
                .then(|| serde_json::json!({ "vouches_required": 2 })),
            unlocks: vec![unlock.to_string()],
            color: None,
        })
        .collect();

        let recognition_sources = [
            (SourceType::QuestCompletion, 1.0f32),
            (SourceType::EndorsementGiven, 0.5),
            (SourceType::EndorsementReceived, 1.0),
        ]
        .into_iter()
        .map(|(source_type, amount)| RecognitionSource {
            id: Uuid::new_v4(),
            game_design_id: design_id,
            source_type,
            amount,
            max_per_day: None,
        })
        .collect();

        Self {
            game_design_id: design_id,
            name: "Classic".to_string(),
            description: Some(
                "The original coordination game with escalating trust and multidimensional growth."
                    .to_string(),
            ),
            value_statement: "We believe communities grow through mutual aid, progressive trust, \
                              and the recognition that everyone has something valuable to \
                              contribute across many domains of life."
                .to_string(),
            design_rationale: "Five difficulty tiers create a natural progression from quick \
                               individual actions to ambitious community projects. Seven skill \
                               domains ensure no single path is valued above others."
                .to_string(),
            version: 1,
            sunset_at: Utc::now() + Duration::days(365 * 2),
            quest_types,
            skill_domains,
            recognition_tiers,
            recognition_sources,
            is_classic_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_shape() {
        let classic = GameConfig::classic();
        assert!(classic.is_classic_fallback);
        assert_eq!(classic.quest_types.len(), 5);
        assert_eq!(classic.skill_domains.len(), 7);
        assert_eq!(classic.recognition_tiers.len(), 5);
        assert_eq!(classic.recognition_sources.len(), 3);
        assert_eq!(classic.quest_type("spark").unwrap().base_recognition, 5);
        assert_eq!(classic.quest_type("inferno").unwrap().base_recognition, 150);
    }

    #[test]
    fn test_content_hash_ignores_row_ids() {
        let a = GameConfig::classic();
        let b = GameConfig::classic();
        // Fresh UUIDs each call, same natural content.
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_from_parts_sorts_children() {
        let design = GameDesign {
            id: Uuid::new_v4(),
            community_id: Uuid::new_v4(),
            name: "Test".to_string(),
            description: None,
            value_statement: "Values".to_string(),
            design_rationale: "Rationale".to_string(),
            status: crate::types::DesignStatus::Active,
            version: 3,
            created_by: Uuid::new_v4(),
            submitted_proposal_id: None,
            sunset_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let classic = GameConfig::classic();
        let mut quest_types = classic.quest_types.clone();
        quest_types.reverse();

        let config = GameConfig::from_parts(
            &design,
            DesignChildren {
                quest_types,
                ..Default::default()
            },
        );

        assert_eq!(config.quest_types[0].slug, "spark");
        assert_eq!(config.quest_types[4].slug, "inferno");
        assert_eq!(config.version, 3);
        assert!(!config.is_classic_fallback);
    }
}
