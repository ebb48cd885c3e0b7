//! Core types for the governance engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::StoreError;

/// Lifecycle status of a proposal.
///
/// `Draft → Deliberation → Voting → {Passed, Rejected, Expired}`. Terminal
/// states never transition again; re-evaluating one is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Being written by its author
    Draft,
    /// Open for discussion, not yet votable
    Deliberation,
    /// Votes are being cast
    Voting,
    /// Quorum met and majority in favor
    Passed,
    /// Deadline reached without quorum or majority
    Rejected,
    /// Abandoned past its maximum lifetime
    Expired,
}

impl ProposalStatus {
    /// True for states no transition leaves.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Passed | Self::Rejected | Self::Expired)
    }

    /// Get string representation for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Deliberation => "deliberation",
            Self::Voting => "voting",
            Self::Passed => "passed",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

/// Vote-weighting scheme for a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    /// Weight = round(sqrt(credits spent)); diminishing returns on spend
    Quadratic,
    /// Every vote weighs 1 regardless of credits
    Approval,
}

/// What a proposal is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalCategory {
    /// Amend the community charter
    CharterAmendment,
    /// Adopt a new game design wholesale
    GameDesign,
    /// Add or change quest templates
    QuestTemplate,
    /// Change a numeric threshold
    ThresholdChange,
    /// A time-limited seasonal quest
    SeasonalQuest,
    /// General rule change
    RuleChange,
    /// Charter a new guild
    GuildCharter,
    /// Federate with another community
    Federation,
    /// Anything else
    Other,
}

impl ProposalCategory {
    /// Categories that carry a game design draft and trigger the
    /// activation transaction on passing.
    pub fn is_config_change(&self) -> bool {
        matches!(self, Self::GameDesign | Self::QuestTemplate)
    }
}

/// A governance proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique identifier
    pub id: Uuid,
    /// Community this proposal belongs to
    pub community_id: Uuid,
    /// Proposing member
    pub author_id: Uuid,
    /// Title
    pub title: String,
    /// Full description
    pub description: String,
    /// What the proposal is about
    pub category: ProposalCategory,
    /// Vote-weighting scheme
    pub vote_type: VoteType,
    /// Lifecycle status
    pub status: ProposalStatus,
    /// Accumulated weight in favor
    pub votes_for: u64,
    /// Accumulated weight against
    pub votes_against: u64,
    /// Minimum combined weight for the outcome to be binding
    pub quorum: u64,
    /// Linked game design draft, required for config-change categories
    pub design_id: Option<Uuid>,
    /// Length of the deliberation phase
    pub deliberation_days: u32,
    /// Length of the voting phase
    pub voting_days: u32,
    /// Set when deliberation starts
    pub deliberation_ends_at: Option<DateTime<Utc>>,
    /// Set when voting starts
    pub voting_ends_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    /// Combined weight cast so far.
    pub fn total_votes(&self) -> u64 {
        self.votes_for + self.votes_against
    }

    /// True once enough weight has been cast for the outcome to bind.
    pub fn quorum_met(&self) -> bool {
        self.total_votes() >= self.quorum
    }
}

/// Input for creating a proposal. Omitted fields take policy defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProposal {
    pub title: String,
    pub description: String,
    pub category: ProposalCategory,
    pub vote_type: VoteType,
    /// Required when the category is a config change
    #[serde(default)]
    pub design_id: Option<Uuid>,
    #[serde(default)]
    pub deliberation_days: Option<u32>,
    #[serde(default)]
    pub voting_days: Option<u32>,
    #[serde(default)]
    pub quorum: Option<u64>,
}

/// One member's vote on one proposal. Unique per (proposal, voter);
/// no amendments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    /// Unique identifier
    pub id: Uuid,
    /// Proposal voted on
    pub proposal_id: Uuid,
    /// Voting member
    pub voter_id: Uuid,
    /// Direction
    pub in_favor: bool,
    /// Credits spent, 1..=100
    pub credits_spent: u32,
    /// Weight added to the tally
    pub weight: u64,
    /// When the vote was cast
    pub cast_at: DateTime<Utc>,
}

/// A community member as the engines see one: the caller-asserted identity
/// enriched with membership and standing. Standing tiers follow the Classic
/// ladder: 1 Newcomer, 2 Neighbor, 3 Pillar, 4 Keeper, 5 Founder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier
    pub id: Uuid,
    /// Community the member belongs to
    pub community_id: Uuid,
    /// Display name
    pub display_name: String,
    /// Standing tier
    pub standing: u8,
}

impl Member {
    /// True when the member's standing reaches the required tier.
    pub fn has_standing(&self, required: u8) -> bool {
        self.standing >= required
    }
}

/// Error types for governance operations.
///
/// `NotFound` deliberately covers both "does not exist" and "exists in
/// another community" so callers cannot enumerate other communities' data.
/// Quorum failure is not an error; it is reported inside the rejected
/// outcome.
#[derive(Debug, thiserror::Error)]
pub enum GovernanceError {
    /// Entity missing or cross-community access attempted
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Actor lacks edit rights on a draft
    #[error("Only the draft creator can do this")]
    NotOwner,

    /// Edit attempted after submission
    #[error("This draft is locked — it has been submitted for governance")]
    DraftLocked,

    /// State machine rule violated
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// One vote per voter per proposal
    #[error("You have already voted on this proposal")]
    AlreadyVoted,

    /// Another activation won the race
    #[error("Another change was already activated for this community")]
    ConcurrentActivation,

    /// The community has never initialized a game design
    #[error("No active game design for this community")]
    NoActiveConfig,

    /// Actor's standing tier is too low
    #[error("Standing tier {required} required")]
    InsufficientStanding {
        /// Minimum tier for the operation
        required: u8,
    },

    /// Malformed input, rejected before touching storage
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A platform guardrail would be violated
    #[error("Guardrail violation: {0}")]
    Guardrail(String),

    /// Storage failure not covered by a domain error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, GovernanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(ProposalStatus::Passed.is_terminal());
        assert!(ProposalStatus::Rejected.is_terminal());
        assert!(ProposalStatus::Expired.is_terminal());
        assert!(!ProposalStatus::Draft.is_terminal());
        assert!(!ProposalStatus::Deliberation.is_terminal());
        assert!(!ProposalStatus::Voting.is_terminal());
    }

    #[test]
    fn test_config_change_categories() {
        assert!(ProposalCategory::GameDesign.is_config_change());
        assert!(ProposalCategory::QuestTemplate.is_config_change());
        assert!(!ProposalCategory::CharterAmendment.is_config_change());
        assert!(!ProposalCategory::Other.is_config_change());
    }

    #[test]
    fn test_enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&ProposalStatus::Deliberation).unwrap(),
            "\"deliberation\""
        );
        assert_eq!(
            serde_json::to_string(&VoteType::Quadratic).unwrap(),
            "\"quadratic\""
        );
        assert_eq!(
            serde_json::to_string(&ProposalCategory::CharterAmendment).unwrap(),
            "\"charter_amendment\""
        );
    }

    #[test]
    fn test_standing_check() {
        let member = Member {
            id: Uuid::new_v4(),
            community_id: Uuid::new_v4(),
            display_name: "Ada".to_string(),
            standing: 3,
        };
        assert!(member.has_standing(2));
        assert!(member.has_standing(3));
        assert!(!member.has_standing(4));
    }
}
