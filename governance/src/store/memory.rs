//! In-memory reference store.
//!
//! The test and reference backend. Conditional operations hold the relevant
//! write locks for their whole critical section, giving the same atomicity a
//! relational backend gets from transactions. Lock order is designs before
//! actives, proposals before votes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use rulebook::template::DesignTemplate;
use rulebook::types::{DesignChildren, DesignStatus, GameDesign};

use crate::types::{Member, Proposal, ProposalStatus, Vote};

use super::traits::{
    DesignStore, MemberStore, ProposalStore, StoreError, StoreResult, TemplateStore,
};

/// The community's current-active pointer.
#[derive(Debug, Clone, Copy)]
struct ActivePointer {
    design_id: Uuid,
    version: u64,
}

/// In-memory implementation of all three store traits.
#[derive(Default)]
pub struct MemoryStore {
    designs: RwLock<HashMap<Uuid, GameDesign>>,
    children: RwLock<HashMap<Uuid, DesignChildren>>,
    actives: RwLock<HashMap<Uuid, ActivePointer>>,
    proposals: RwLock<HashMap<Uuid, Proposal>>,
    votes: RwLock<HashMap<Uuid, Vec<Vote>>>,
    members: RwLock<HashMap<Uuid, Member>>,
    templates: RwLock<HashMap<Uuid, DesignTemplate>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member.
    pub async fn add_member(&self, member: Member) {
        self.members.write().await.insert(member.id, member);
    }

    /// Register a design template.
    pub async fn add_template(&self, template: DesignTemplate) {
        self.templates.write().await.insert(template.id, template);
    }

    /// Seed a community's initial active design directly, bypassing
    /// governance. For bootstrap and tests only.
    pub async fn seed_active_design(
        &self,
        mut design: GameDesign,
        children: DesignChildren,
    ) {
        design.status = DesignStatus::Active;
        let mut designs = self.designs.write().await;
        let mut actives = self.actives.write().await;
        actives.insert(
            design.community_id,
            ActivePointer {
                design_id: design.id,
                version: 1,
            },
        );
        self.children.write().await.insert(design.id, children);
        designs.insert(design.id, design);
    }
}

#[async_trait]
impl DesignStore for MemoryStore {
    async fn insert_design(
        &self,
        design: GameDesign,
        children: DesignChildren,
    ) -> StoreResult<()> {
        let mut designs = self.designs.write().await;
        if designs.contains_key(&design.id) {
            return Err(StoreError::UniqueViolation(format!(
                "design {}",
                design.id
            )));
        }
        self.children.write().await.insert(design.id, children);
        designs.insert(design.id, design);
        Ok(())
    }

    async fn design(&self, design_id: Uuid) -> StoreResult<Option<GameDesign>> {
        Ok(self.designs.read().await.get(&design_id).cloned())
    }

    async fn children(&self, design_id: Uuid) -> StoreResult<DesignChildren> {
        self.children
            .read()
            .await
            .get(&design_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("children of design {}", design_id)))
    }

    async fn active_design(&self, community_id: Uuid) -> StoreResult<Option<GameDesign>> {
        let designs = self.designs.read().await;
        let actives = self.actives.read().await;
        Ok(actives
            .get(&community_id)
            .and_then(|ptr| designs.get(&ptr.design_id))
            .cloned())
    }

    async fn active_version(&self, community_id: Uuid) -> StoreResult<u64> {
        Ok(self
            .actives
            .read()
            .await
            .get(&community_id)
            .map(|ptr| ptr.version)
            .unwrap_or(0))
    }

    async fn community_drafts(&self, community_id: Uuid) -> StoreResult<Vec<GameDesign>> {
        let designs = self.designs.read().await;
        let mut drafts: Vec<GameDesign> = designs
            .values()
            .filter(|d| d.community_id == community_id && d.status == DesignStatus::Draft)
            .cloned()
            .collect();
        drafts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(drafts)
    }

    async fn update_design(&self, design: GameDesign) -> StoreResult<()> {
        let mut designs = self.designs.write().await;
        if !designs.contains_key(&design.id) {
            return Err(StoreError::NotFound(format!("design {}", design.id)));
        }
        designs.insert(design.id, design);
        Ok(())
    }

    async fn update_children(
        &self,
        design_id: Uuid,
        children: DesignChildren,
    ) -> StoreResult<()> {
        let mut map = self.children.write().await;
        if !map.contains_key(&design_id) {
            return Err(StoreError::NotFound(format!("children of design {}", design_id)));
        }
        map.insert(design_id, children);
        Ok(())
    }

    async fn lock_design(
        &self,
        design_id: Uuid,
        proposal_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut designs = self.designs.write().await;
        let design = designs
            .get_mut(&design_id)
            .ok_or_else(|| StoreError::NotFound(format!("design {}", design_id)))?;

        if !design.is_editable() {
            return Err(StoreError::ConditionFailed(format!(
                "design {} is not an unlocked draft",
                design_id
            )));
        }
        design.submitted_proposal_id = Some(proposal_id);
        design.updated_at = now;
        Ok(())
    }

    async fn activate_design(
        &self,
        community_id: Uuid,
        design_id: Uuid,
        expected_version: u64,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut designs = self.designs.write().await;
        let mut actives = self.actives.write().await;

        let current_version = actives.get(&community_id).map(|p| p.version).unwrap_or(0);
        if current_version != expected_version {
            return Err(StoreError::ConditionFailed(format!(
                "active pointer at version {}, expected {}",
                current_version, expected_version
            )));
        }

        {
            let draft = designs
                .get(&design_id)
                .ok_or_else(|| StoreError::NotFound(format!("design {}", design_id)))?;
            if draft.community_id != community_id
                || draft.status != DesignStatus::Draft
                || draft.submitted_proposal_id.is_none()
            {
                return Err(StoreError::ConditionFailed(format!(
                    "design {} is not a locked draft of community {}",
                    design_id, community_id
                )));
            }
        }

        // Archive the outgoing active design.
        if let Some(ptr) = actives.get(&community_id) {
            if let Some(previous) = designs.get_mut(&ptr.design_id) {
                previous.status = DesignStatus::Archived;
                previous.updated_at = now;
            }
        }

        let draft = designs
            .get_mut(&design_id)
            .ok_or_else(|| StoreError::NotFound(format!("design {}", design_id)))?;
        draft.status = DesignStatus::Active;
        draft.updated_at = now;

        let new_version = current_version + 1;
        actives.insert(
            community_id,
            ActivePointer {
                design_id,
                version: new_version,
            },
        );
        Ok(new_version)
    }
}

#[async_trait]
impl ProposalStore for MemoryStore {
    async fn insert_proposal(&self, proposal: Proposal) -> StoreResult<()> {
        let mut proposals = self.proposals.write().await;
        if proposals.contains_key(&proposal.id) {
            return Err(StoreError::UniqueViolation(format!(
                "proposal {}",
                proposal.id
            )));
        }
        proposals.insert(proposal.id, proposal);
        Ok(())
    }

    async fn proposal(&self, proposal_id: Uuid) -> StoreResult<Option<Proposal>> {
        Ok(self.proposals.read().await.get(&proposal_id).cloned())
    }

    async fn community_proposals(&self, community_id: Uuid) -> StoreResult<Vec<Proposal>> {
        let proposals = self.proposals.read().await;
        let mut result: Vec<Proposal> = proposals
            .values()
            .filter(|p| p.community_id == community_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn open_proposals(&self) -> StoreResult<Vec<Proposal>> {
        let proposals = self.proposals.read().await;
        Ok(proposals
            .values()
            .filter(|p| !p.status.is_terminal())
            .cloned()
            .collect())
    }

    async fn transition(
        &self,
        proposal_id: Uuid,
        from: ProposalStatus,
        to: ProposalStatus,
        deliberation_ends_at: Option<DateTime<Utc>>,
        voting_ends_at: Option<DateTime<Utc>>,
    ) -> StoreResult<Proposal> {
        let mut proposals = self.proposals.write().await;
        let proposal = proposals
            .get_mut(&proposal_id)
            .ok_or_else(|| StoreError::NotFound(format!("proposal {}", proposal_id)))?;

        if proposal.status != from {
            return Err(StoreError::ConditionFailed(format!(
                "proposal {} is {}, expected {}",
                proposal_id,
                proposal.status.as_str(),
                from.as_str()
            )));
        }

        proposal.status = to;
        if deliberation_ends_at.is_some() {
            proposal.deliberation_ends_at = deliberation_ends_at;
        }
        if voting_ends_at.is_some() {
            proposal.voting_ends_at = voting_ends_at;
        }
        Ok(proposal.clone())
    }

    async fn record_vote(&self, vote: Vote) -> StoreResult<Proposal> {
        let mut proposals = self.proposals.write().await;
        let mut votes = self.votes.write().await;

        let proposal = proposals
            .get_mut(&vote.proposal_id)
            .ok_or_else(|| StoreError::NotFound(format!("proposal {}", vote.proposal_id)))?;

        let proposal_votes = votes.entry(vote.proposal_id).or_default();
        if proposal_votes.iter().any(|v| v.voter_id == vote.voter_id) {
            return Err(StoreError::UniqueViolation(format!(
                "vote ({}, {})",
                vote.proposal_id, vote.voter_id
            )));
        }

        if vote.in_favor {
            proposal.votes_for += vote.weight;
        } else {
            proposal.votes_against += vote.weight;
        }
        proposal_votes.push(vote);
        Ok(proposal.clone())
    }

    async fn votes(&self, proposal_id: Uuid) -> StoreResult<Vec<Vote>> {
        Ok(self
            .votes
            .read()
            .await
            .get(&proposal_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn member(&self, member_id: Uuid) -> StoreResult<Option<Member>> {
        Ok(self.members.read().await.get(&member_id).cloned())
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn template(&self, template_id: Uuid) -> StoreResult<Option<DesignTemplate>> {
        Ok(self.templates.read().await.get(&template_id).cloned())
    }

    async fn templates(&self) -> StoreResult<Vec<DesignTemplate>> {
        let templates = self.templates.read().await;
        let mut all: Vec<DesignTemplate> = templates.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}
