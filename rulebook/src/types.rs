//! Core types for community game designs.
//!
//! A community's entire gameplay ruleset is data: one [`GameDesign`] row plus
//! four child collections (quest types, skill domains, recognition tiers,
//! recognition sources). Children are mutated only while the parent design is
//! a draft; once submitted for governance the whole tree is immutable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a game design.
///
/// At most one design per community is `Active` at any time. A draft becomes
/// active only through a passed governance proposal; the design it replaces
/// is archived in the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignStatus {
    /// Editable by its creator, not yet submitted
    Draft,
    /// The live ruleset for the community
    Active,
    /// Replaced, rejected, or abandoned
    Archived,
}

impl DesignStatus {
    /// Get string representation for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

/// A versioned instance of a community ruleset plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDesign {
    /// Unique identifier
    pub id: Uuid,
    /// Community this design belongs to
    pub community_id: Uuid,
    /// Display name
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// What the community values, in its own words
    pub value_statement: String,
    /// Why these rules were chosen
    pub design_rationale: String,
    /// Lifecycle status
    pub status: DesignStatus,
    /// Monotonic version within the community
    pub version: u32,
    /// Member who created the draft
    pub created_by: Uuid,
    /// Set when the draft is submitted for governance; locks editing
    pub submitted_proposal_id: Option<Uuid>,
    /// When this ruleset must be revisited
    pub sunset_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl GameDesign {
    /// True while the design is an unsubmitted draft.
    pub fn is_editable(&self) -> bool {
        self.status == DesignStatus::Draft && self.submitted_proposal_id.is_none()
    }
}

/// How a quest completion is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMethod {
    /// The quester's word is enough
    SelfReport,
    /// One peer confirms
    PeerConfirm,
    /// Photo evidence plus a peer
    PhotoAndPeer,
    /// Community members vote to validate
    CommunityVote,
    /// Community vote with documented evidence
    CommunityVoteAndEvidence,
}

/// What a quest completion earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionType {
    /// Skill experience points
    Xp,
    /// A narrative entry in the quester's story
    Narrative,
    /// A badge
    Badge,
    /// Prompts peers to endorse
    EndorsementPrompt,
    /// Nothing beyond the deed itself
    None,
}

/// A quest type a community offers, e.g. "cleanup" or "tutoring".
///
/// Natural key: `slug`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestType {
    /// Unique identifier
    pub id: Uuid,
    /// Owning design
    pub game_design_id: Uuid,
    /// Stable natural key, lowercase alphanumeric with dashes
    pub slug: String,
    /// Display label
    pub label: String,
    /// Optional description
    pub description: Option<String>,
    /// How completion is validated
    pub validation_method: ValidationMethod,
    /// Votes/confirmations required where the method needs them
    pub validation_threshold: u32,
    /// What completion earns
    pub recognition_type: RecognitionType,
    /// Base recognition amount
    pub base_recognition: u32,
    /// Prompt shown when recognition is narrative
    pub narrative_prompt: Option<String>,
    /// Hours before the same member may repeat this quest type
    pub cooldown_hours: u32,
    /// Maximum party size
    pub max_party_size: u32,
    /// Position in listings
    pub sort_order: u32,
    /// Display color token
    pub color: Option<String>,
    /// Display icon token
    pub icon: Option<String>,
}

/// Default visibility of a member's progress in a skill domain.
///
/// Skills are never fully public; the most open option is a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityDefault {
    /// Visible only to the member
    Private,
    /// Member may opt in to sharing
    OptIn,
    /// Tier and domain summary visible
    SummaryOnly,
}

/// A skill domain members grow in, e.g. "craft" or "care".
///
/// Natural key: `slug`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDomain {
    /// Unique identifier
    pub id: Uuid,
    /// Owning design
    pub game_design_id: Uuid,
    /// Stable natural key
    pub slug: String,
    /// Display label
    pub label: String,
    /// Optional description
    pub description: Option<String>,
    /// Example activities
    pub examples: Vec<String>,
    /// Display color token
    pub color: Option<String>,
    /// Display icon token
    pub icon: Option<String>,
    /// Default progress visibility
    pub visibility_default: VisibilityDefault,
    /// Position in listings
    pub sort_order: u32,
}

/// What a recognition tier threshold counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdType {
    /// Accumulated recognition points
    Points,
    /// Completed quests
    QuestsCompleted,
    /// Endorsements received
    Endorsements,
    /// Days since joining
    TimeInCommunity,
    /// Combination defined in additional requirements
    Composite,
}

/// A standing tier members climb, e.g. "Neighbor" or "Keeper".
///
/// Natural key: `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionTier {
    /// Unique identifier
    pub id: Uuid,
    /// Owning design
    pub game_design_id: Uuid,
    /// Ordering number, 1 is the entry tier
    pub tier_number: u32,
    /// Stable natural key
    pub name: String,
    /// What the threshold counts
    pub threshold_type: ThresholdType,
    /// Threshold value
    pub threshold_value: u32,
    /// Extra requirements, e.g. vouches
    pub additional_requirements: Option<serde_json::Value>,
    /// What reaching this tier unlocks
    pub unlocks: Vec<String>,
    /// Display color token
    pub color: Option<String>,
}

/// An activity that grants recognition points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Completing a quest
    QuestCompletion,
    /// Endorsing another member
    EndorsementGiven,
    /// Being endorsed
    EndorsementReceived,
    /// Mentoring a newer member
    Mentoring,
}

impl SourceType {
    /// Get string representation, also the diff natural key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuestCompletion => "quest_completion",
            Self::EndorsementGiven => "endorsement_given",
            Self::EndorsementReceived => "endorsement_received",
            Self::Mentoring => "mentoring",
        }
    }
}

/// How much recognition an activity grants.
///
/// Natural key: `source_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionSource {
    /// Unique identifier
    pub id: Uuid,
    /// Owning design
    pub game_design_id: Uuid,
    /// The granting activity, at most one row per type
    pub source_type: SourceType,
    /// Points granted per occurrence
    pub amount: f32,
    /// Daily cap, unlimited when absent
    pub max_per_day: Option<u32>,
}

/// The four child collections of one design, moved around as a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignChildren {
    /// Quest types, keyed by slug
    pub quest_types: Vec<QuestType>,
    /// Skill domains, keyed by slug
    pub skill_domains: Vec<SkillDomain>,
    /// Recognition tiers, keyed by name
    pub recognition_tiers: Vec<RecognitionTier>,
    /// Recognition sources, keyed by source type
    pub recognition_sources: Vec<RecognitionSource>,
}

impl DesignChildren {
    /// Sort every collection by its natural sort key.
    pub fn sorted(mut self) -> Self {
        self.quest_types.sort_by_key(|qt| qt.sort_order);
        self.skill_domains.sort_by_key(|sd| sd.sort_order);
        self.recognition_tiers.sort_by_key(|rt| rt.tier_number);
        self.recognition_sources
            .sort_by_key(|rs| rs.source_type.as_str());
        self
    }

    /// Deep-copy into a new owning design, assigning fresh row ids.
    pub fn fork_for(&self, game_design_id: Uuid) -> Self {
        let mut copy = self.clone();
        for qt in &mut copy.quest_types {
            qt.id = Uuid::new_v4();
            qt.game_design_id = game_design_id;
        }
        for sd in &mut copy.skill_domains {
            sd.id = Uuid::new_v4();
            sd.game_design_id = game_design_id;
        }
        for rt in &mut copy.recognition_tiers {
            rt.id = Uuid::new_v4();
            rt.game_design_id = game_design_id;
        }
        for rs in &mut copy.recognition_sources {
            rs.id = Uuid::new_v4();
            rs.game_design_id = game_design_id;
        }
        copy
    }
}
