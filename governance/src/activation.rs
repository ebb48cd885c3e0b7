//! Activation transaction.
//!
//! The bridge from governance to gameplay: when a config-change proposal
//! passes, the previously active design is archived and the locked draft
//! promoted, atomically, behind a compare-and-swap on the community's active
//! pointer version. Exactly one of two racing activations wins; the loser
//! fails cleanly with `ConcurrentActivation` and the "at most one active
//! design per community" invariant holds throughout.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use rulebook::types::DesignStatus;

use crate::clock::Clock;
use crate::config::GovernanceConfig;
use crate::resolver::ConfigResolver;
use crate::store::{DesignStore, MemberStore, ProposalStore, StoreError};
use crate::types::{GovernanceError, ProposalStatus, Result};

/// Applies passed config-change proposals.
pub struct Activator {
    proposals: Arc<dyn ProposalStore>,
    designs: Arc<dyn DesignStore>,
    members: Arc<dyn MemberStore>,
    resolver: Arc<ConfigResolver>,
    clock: Arc<dyn Clock>,
    config: GovernanceConfig,
}

impl Activator {
    /// Create an activator.
    pub fn new(
        proposals: Arc<dyn ProposalStore>,
        designs: Arc<dyn DesignStore>,
        members: Arc<dyn MemberStore>,
        resolver: Arc<ConfigResolver>,
        clock: Arc<dyn Clock>,
        config: GovernanceConfig,
    ) -> Self {
        Self {
            proposals,
            designs,
            members,
            resolver,
            clock,
            config,
        }
    }

    /// Activate the design draft linked to a passed proposal.
    ///
    /// Returns the community's new active pointer version. Calling again
    /// after a successful activation is a no-op returning the current
    /// version.
    pub async fn activate(&self, actor: Uuid, proposal_id: Uuid) -> Result<u64> {
        let member = self
            .members
            .member(actor)
            .await?
            .ok_or(GovernanceError::NotFound("Member"))?;
        let required = self.config.proposals.proposer_standing;
        if !member.has_standing(required) {
            return Err(GovernanceError::InsufficientStanding { required });
        }

        let proposal = self
            .proposals
            .proposal(proposal_id)
            .await?
            .filter(|p| p.community_id == member.community_id)
            .ok_or(GovernanceError::NotFound("Proposal"))?;

        if proposal.status != ProposalStatus::Passed {
            return Err(GovernanceError::InvalidTransition(format!(
                "cannot activate a {} proposal",
                proposal.status.as_str()
            )));
        }

        let design_id = proposal.design_id.ok_or_else(|| {
            GovernanceError::InvalidInput("Proposal has no design attached".to_string())
        })?;
        let design = self
            .designs
            .design(design_id)
            .await?
            .ok_or(GovernanceError::NotFound("Game design"))?;

        if design.submitted_proposal_id != Some(proposal_id) {
            return Err(GovernanceError::InvalidTransition(
                "design is not locked by this proposal".to_string(),
            ));
        }

        let expected_version = self.designs.active_version(design.community_id).await?;

        // Already applied: the linked design is the current active one.
        if design.status == DesignStatus::Active {
            return Ok(expected_version);
        }
        if design.status != DesignStatus::Draft {
            return Err(GovernanceError::InvalidTransition(format!(
                "cannot activate a design in {} status",
                design.status.as_str()
            )));
        }

        let new_version = match self
            .designs
            .activate_design(
                design.community_id,
                design_id,
                expected_version,
                self.clock.now(),
            )
            .await
        {
            Ok(version) => version,
            Err(StoreError::ConditionFailed(_)) => {
                return Err(GovernanceError::ConcurrentActivation)
            }
            Err(e) => return Err(e.into()),
        };

        self.resolver.invalidate(design.community_id);

        info!(
            proposal_id = %proposal_id,
            design_id = %design_id,
            community_id = %design.community_id,
            version = new_version,
            "Design activated"
        );
        Ok(new_version)
    }
}
