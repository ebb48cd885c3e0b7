//! Storage trait seams.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use rulebook::template::DesignTemplate;
use rulebook::types::{DesignChildren, GameDesign};

use crate::types::{Member, Proposal, ProposalStatus, Vote};

/// Error types for storage operations.
///
/// Engines translate these into domain errors; raw store errors never reach
/// callers for conflicts the domain has a word for (`AlreadyVoted`,
/// `ConcurrentActivation`, `DraftLocked`).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Row missing
    #[error("not found: {0}")]
    NotFound(String),

    /// Unique constraint violated
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Conditional update found different state than expected
    #[error("conditional update failed: {0}")]
    ConditionFailed(String),

    /// Backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for game designs and their child collections.
#[async_trait]
pub trait DesignStore: Send + Sync {
    /// Insert a new design with its children.
    async fn insert_design(&self, design: GameDesign, children: DesignChildren)
        -> StoreResult<()>;

    /// Fetch a design by id.
    async fn design(&self, design_id: Uuid) -> StoreResult<Option<GameDesign>>;

    /// Fetch a design's child collections.
    async fn children(&self, design_id: Uuid) -> StoreResult<DesignChildren>;

    /// The community's active design, if any.
    async fn active_design(&self, community_id: Uuid) -> StoreResult<Option<GameDesign>>;

    /// Monotonic version of the community's active pointer; 0 before the
    /// first activation.
    async fn active_version(&self, community_id: Uuid) -> StoreResult<u64>;

    /// All draft designs in a community.
    async fn community_drafts(&self, community_id: Uuid) -> StoreResult<Vec<GameDesign>>;

    /// Replace a design row.
    async fn update_design(&self, design: GameDesign) -> StoreResult<()>;

    /// Replace a design's child collections.
    async fn update_children(&self, design_id: Uuid, children: DesignChildren)
        -> StoreResult<()>;

    /// Conditionally lock a draft for governance: succeeds only while the
    /// design is an unlocked draft, otherwise `ConditionFailed`.
    async fn lock_design(
        &self,
        design_id: Uuid,
        proposal_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// Atomically archive the community's active design (if any) and promote
    /// the given locked draft, compare-and-swapping on the active pointer
    /// version. Returns the new version. `ConditionFailed` when the pointer
    /// moved or the draft is no longer eligible — exactly one of two racing
    /// activations can succeed.
    async fn activate_design(
        &self,
        community_id: Uuid,
        design_id: Uuid,
        expected_version: u64,
        now: DateTime<Utc>,
    ) -> StoreResult<u64>;
}

/// Persistence for proposals and votes.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Insert a new proposal.
    async fn insert_proposal(&self, proposal: Proposal) -> StoreResult<()>;

    /// Fetch a proposal by id.
    async fn proposal(&self, proposal_id: Uuid) -> StoreResult<Option<Proposal>>;

    /// All proposals in a community, newest first.
    async fn community_proposals(&self, community_id: Uuid) -> StoreResult<Vec<Proposal>>;

    /// All proposals not yet in a terminal state.
    async fn open_proposals(&self) -> StoreResult<Vec<Proposal>>;

    /// Conditional status transition: succeeds only while the proposal is in
    /// `from`, applying the deadline patches with it. `ConditionFailed` when
    /// another actor transitioned first, which overlapping tick invocations
    /// treat as already-applied.
    async fn transition(
        &self,
        proposal_id: Uuid,
        from: ProposalStatus,
        to: ProposalStatus,
        deliberation_ends_at: Option<DateTime<Utc>>,
        voting_ends_at: Option<DateTime<Utc>>,
    ) -> StoreResult<Proposal>;

    /// Insert a vote and add its weight to the proposal tally in one atomic
    /// operation. `UniqueViolation` when the voter already voted, including
    /// under a race to insert. Returns the updated proposal.
    async fn record_vote(&self, vote: Vote) -> StoreResult<Proposal>;

    /// All votes on a proposal.
    async fn votes(&self, proposal_id: Uuid) -> StoreResult<Vec<Vote>>;
}

/// Lookup of community members.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Fetch a member by id.
    async fn member(&self, member_id: Uuid) -> StoreResult<Option<Member>>;
}

/// Lookup of design templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Fetch a template by id.
    async fn template(&self, template_id: Uuid) -> StoreResult<Option<DesignTemplate>>;

    /// All templates, ordered by name.
    async fn templates(&self) -> StoreResult<Vec<DesignTemplate>>;
}
