//! Proposal state machine and voting.
//!
//! `Draft → Deliberation → Voting → {Passed, Rejected, Expired}`. Submission
//! starts deliberation and locks the referenced design draft for
//! config-change categories. Deadline-driven transitions are computed by the
//! pure [`next_status`] and applied through conditional store updates, so
//! `tick()` is idempotent and safe under overlapping invocations — the
//! external scheduler can fire it as often as it likes.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use rulebook::guardrails;
use rulebook::types::DesignStatus;

use crate::clock::Clock;
use crate::config::{
    GovernanceConfig, VotingPolicy, DELIBERATION_DAYS_RANGE, VOTING_DAYS_RANGE,
};
use crate::store::{DesignStore, MemberStore, ProposalStore, StoreError};
use crate::types::{
    GovernanceError, Member, NewProposal, Proposal, ProposalStatus, Result, Vote, VoteType,
};

/// Compute the weight of one vote.
///
/// Quadratic: `round(sqrt(credits))`, so 1..=100 credits yields weight
/// 1..=10 — doubling spend never doubles influence. Approval: always 1.
/// Credits are validated before any storage is touched.
pub fn vote_weight(vote_type: VoteType, credits_spent: u32, policy: &VotingPolicy) -> Result<u64> {
    if credits_spent < policy.min_credits || credits_spent > policy.max_credits {
        return Err(GovernanceError::InvalidInput(format!(
            "Credits must be an integer between {} and {}",
            policy.min_credits, policy.max_credits
        )));
    }
    Ok(match vote_type {
        VoteType::Quadratic => (credits_spent as f64).sqrt().round() as u64,
        VoteType::Approval => 1,
    })
}

/// A deadline transition [`next_status`] determined should be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    /// Target status
    pub to: ProposalStatus,
    /// Voting deadline, set when entering the voting phase
    pub voting_ends_at: Option<DateTime<Utc>>,
    /// Whether quorum was met, set when entering a terminal vote outcome
    pub quorum_met: Option<bool>,
}

/// Pure deadline evaluation: what transition, if any, is due at `now`.
///
/// Terminal proposals always return `None` — re-evaluating one is a no-op.
pub fn next_status(
    proposal: &Proposal,
    now: DateTime<Utc>,
    max_lifetime_days: u32,
) -> Option<PendingTransition> {
    match proposal.status {
        ProposalStatus::Draft => {
            let expiry = proposal.created_at + Duration::days(max_lifetime_days as i64);
            (now >= expiry).then(|| PendingTransition {
                to: ProposalStatus::Expired,
                voting_ends_at: None,
                quorum_met: None,
            })
        }
        ProposalStatus::Deliberation => {
            let ends = proposal.deliberation_ends_at?;
            (now >= ends).then(|| PendingTransition {
                to: ProposalStatus::Voting,
                voting_ends_at: Some(now + Duration::days(proposal.voting_days as i64)),
                quorum_met: None,
            })
        }
        ProposalStatus::Voting => {
            let ends = proposal.voting_ends_at?;
            if now < ends {
                return None;
            }
            let quorum_met = proposal.quorum_met();
            let passed = quorum_met && proposal.votes_for > proposal.votes_against;
            Some(PendingTransition {
                to: if passed {
                    ProposalStatus::Passed
                } else {
                    ProposalStatus::Rejected
                },
                voting_ends_at: None,
                quorum_met: Some(quorum_met),
            })
        }
        ProposalStatus::Passed | ProposalStatus::Rejected | ProposalStatus::Expired => None,
    }
}

/// One transition applied by a tick sweep.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// Proposal that moved
    pub proposal_id: Uuid,
    /// Status it left
    pub from: ProposalStatus,
    /// Status it entered
    pub to: ProposalStatus,
    /// Quorum flag for terminal vote outcomes
    pub quorum_met: Option<bool>,
}

/// Owns the proposal lifecycle: creation, submission, voting, and the
/// deadline sweep.
pub struct ProposalEngine {
    proposals: Arc<dyn ProposalStore>,
    designs: Arc<dyn DesignStore>,
    members: Arc<dyn MemberStore>,
    clock: Arc<dyn Clock>,
    config: GovernanceConfig,
}

impl ProposalEngine {
    /// Create a proposal engine.
    pub fn new(
        proposals: Arc<dyn ProposalStore>,
        designs: Arc<dyn DesignStore>,
        members: Arc<dyn MemberStore>,
        clock: Arc<dyn Clock>,
        config: GovernanceConfig,
    ) -> Self {
        Self {
            proposals,
            designs,
            members,
            clock,
            config,
        }
    }

    async fn require_member(&self, actor: Uuid) -> Result<Member> {
        self.members
            .member(actor)
            .await?
            .ok_or(GovernanceError::NotFound("Member"))
    }

    /// Load a proposal visible to the actor; cross-community access is
    /// indistinguishable from a missing proposal.
    async fn visible_proposal(&self, actor: Uuid, proposal_id: Uuid) -> Result<(Member, Proposal)> {
        let member = self.require_member(actor).await?;
        let proposal = self
            .proposals
            .proposal(proposal_id)
            .await?
            .filter(|p| p.community_id == member.community_id)
            .ok_or(GovernanceError::NotFound("Proposal"))?;
        Ok((member, proposal))
    }

    /// Create a proposal in draft status.
    pub async fn create(&self, actor: Uuid, input: NewProposal) -> Result<Proposal> {
        let member = self.require_member(actor).await?;
        let required = self.config.proposals.proposer_standing;
        if !member.has_standing(required) {
            return Err(GovernanceError::InsufficientStanding { required });
        }

        if input.title.len() < 5 || input.title.len() > 200 {
            return Err(GovernanceError::InvalidInput(
                "Title must be 5-200 characters".to_string(),
            ));
        }
        if input.description.len() < 20 || input.description.len() > 5000 {
            return Err(GovernanceError::InvalidInput(
                "Description must be 20-5000 characters".to_string(),
            ));
        }

        let deliberation_days = input
            .deliberation_days
            .unwrap_or(self.config.proposals.deliberation_days);
        let (min_d, max_d) = DELIBERATION_DAYS_RANGE;
        if deliberation_days < min_d || deliberation_days > max_d {
            return Err(GovernanceError::InvalidInput(format!(
                "Deliberation must last {}-{} days",
                min_d, max_d
            )));
        }

        let voting_days = input.voting_days.unwrap_or(self.config.proposals.voting_days);
        let (min_v, max_v) = VOTING_DAYS_RANGE;
        if voting_days < min_v || voting_days > max_v {
            return Err(GovernanceError::InvalidInput(format!(
                "Voting must last {}-{} days",
                min_v, max_v
            )));
        }

        let quorum = input.quorum.unwrap_or(self.config.proposals.default_quorum);
        if quorum == 0 {
            return Err(GovernanceError::InvalidInput(
                "Quorum must be at least 1".to_string(),
            ));
        }

        if input.category.is_config_change() {
            let design_id = input.design_id.ok_or_else(|| {
                GovernanceError::InvalidInput(
                    "Config-change proposals must reference a design draft".to_string(),
                )
            })?;
            let design = self
                .designs
                .design(design_id)
                .await?
                .filter(|d| d.community_id == member.community_id)
                .ok_or(GovernanceError::NotFound("Game design"))?;
            if design.created_by != member.id {
                return Err(GovernanceError::NotOwner);
            }
            if !design.is_editable() {
                return Err(GovernanceError::DraftLocked);
            }
        } else if input.design_id.is_some() {
            return Err(GovernanceError::InvalidInput(
                "Only config-change proposals may reference a design".to_string(),
            ));
        }

        let proposal = Proposal {
            id: Uuid::new_v4(),
            community_id: member.community_id,
            author_id: member.id,
            title: input.title,
            description: input.description,
            category: input.category,
            vote_type: input.vote_type,
            status: ProposalStatus::Draft,
            votes_for: 0,
            votes_against: 0,
            quorum,
            design_id: input.design_id,
            deliberation_days,
            voting_days,
            deliberation_ends_at: None,
            voting_ends_at: None,
            created_at: self.clock.now(),
        };
        self.proposals.insert_proposal(proposal.clone()).await?;

        info!(
            proposal_id = %proposal.id,
            community_id = %proposal.community_id,
            category = ?proposal.category,
            "Proposal created"
        );
        Ok(proposal)
    }

    /// Submit a draft proposal: moves it into deliberation and, for
    /// config-change categories, locks the referenced design.
    pub async fn submit(&self, actor: Uuid, proposal_id: Uuid) -> Result<Proposal> {
        let (member, proposal) = self.visible_proposal(actor, proposal_id).await?;
        if proposal.author_id != member.id {
            return Err(GovernanceError::NotOwner);
        }
        if proposal.status != ProposalStatus::Draft {
            return Err(GovernanceError::InvalidTransition(format!(
                "cannot submit a {} proposal",
                proposal.status.as_str()
            )));
        }

        let now = self.clock.now();

        if proposal.category.is_config_change() {
            let design_id = proposal.design_id.ok_or_else(|| {
                GovernanceError::InvalidInput(
                    "Config-change proposal has no design attached".to_string(),
                )
            })?;
            let design = self
                .designs
                .design(design_id)
                .await?
                .ok_or(GovernanceError::NotFound("Game design"))?;

            let children = self.designs.children(design_id).await?;
            let violations = guardrails::validate_design(
                design.sunset_at,
                now,
                children.quest_types.len(),
                children.skill_domains.len(),
                children.recognition_tiers.len(),
            );
            if !violations.is_empty() {
                let messages: Vec<_> =
                    violations.into_iter().map(|v| v.message).collect();
                return Err(GovernanceError::Guardrail(messages.join("; ")));
            }

            match self.designs.lock_design(design_id, proposal_id, now).await {
                Ok(()) => {}
                Err(StoreError::ConditionFailed(_)) => return Err(GovernanceError::DraftLocked),
                Err(e) => return Err(e.into()),
            }
        }

        let deliberation_ends = now + Duration::days(proposal.deliberation_days as i64);
        let submitted = match self
            .proposals
            .transition(
                proposal_id,
                ProposalStatus::Draft,
                ProposalStatus::Deliberation,
                Some(deliberation_ends),
                None,
            )
            .await
        {
            Ok(p) => p,
            Err(e) => {
                // Roll the lock back so the draft is not stranded.
                if let Some(design_id) = proposal.design_id {
                    if let Ok(Some(mut design)) = self.designs.design(design_id).await {
                        if design.submitted_proposal_id == Some(proposal_id) {
                            design.submitted_proposal_id = None;
                            design.updated_at = now;
                            if let Err(unlock_err) = self.designs.update_design(design).await {
                                warn!(
                                    design_id = %design_id,
                                    error = %unlock_err,
                                    "Failed to unlock design after submit rollback"
                                );
                            }
                        }
                    }
                }
                return Err(match e {
                    StoreError::ConditionFailed(msg) => GovernanceError::InvalidTransition(msg),
                    other => other.into(),
                });
            }
        };

        info!(
            proposal_id = %proposal_id,
            deliberation_ends_at = %deliberation_ends,
            "Proposal submitted for deliberation"
        );
        Ok(submitted)
    }

    /// Cast a vote. One vote per member per proposal, no amendments; the
    /// vote row and the tally increment land atomically.
    pub async fn cast_vote(
        &self,
        actor: Uuid,
        proposal_id: Uuid,
        in_favor: bool,
        credits_spent: u32,
    ) -> Result<Vote> {
        let (member, proposal) = self.visible_proposal(actor, proposal_id).await?;
        let required = self.config.voting.voter_standing;
        if !member.has_standing(required) {
            return Err(GovernanceError::InsufficientStanding { required });
        }

        if proposal.status != ProposalStatus::Voting {
            return Err(GovernanceError::InvalidTransition(
                "proposal is not in voting phase".to_string(),
            ));
        }
        let now = self.clock.now();
        if proposal.voting_ends_at.is_some_and(|ends| now >= ends) {
            return Err(GovernanceError::InvalidTransition(
                "voting period has ended".to_string(),
            ));
        }

        let weight = vote_weight(proposal.vote_type, credits_spent, &self.config.voting)?;
        let vote = Vote {
            id: Uuid::new_v4(),
            proposal_id,
            voter_id: member.id,
            in_favor,
            credits_spent,
            weight,
            cast_at: now,
        };

        let updated = match self.proposals.record_vote(vote.clone()).await {
            Ok(p) => p,
            Err(StoreError::UniqueViolation(_)) => return Err(GovernanceError::AlreadyVoted),
            Err(e) => return Err(e.into()),
        };

        info!(
            proposal_id = %proposal_id,
            voter_id = %member.id,
            in_favor,
            weight,
            votes_for = updated.votes_for,
            votes_against = updated.votes_against,
            "Vote recorded"
        );
        Ok(vote)
    }

    /// Sweep every open proposal past a deadline into its next state.
    ///
    /// Idempotent and safe under concurrent invocation: each transition is a
    /// conditional store update, and a lost race means another sweep already
    /// applied it.
    pub async fn tick(&self) -> Result<Vec<TickOutcome>> {
        let now = self.clock.now();
        let open = self.proposals.open_proposals().await?;
        let mut outcomes = Vec::new();

        for proposal in open {
            let Some(transition) =
                next_status(&proposal, now, self.config.proposals.max_lifetime_days)
            else {
                continue;
            };

            let applied = self
                .proposals
                .transition(
                    proposal.id,
                    proposal.status,
                    transition.to,
                    None,
                    transition.voting_ends_at,
                )
                .await;

            match applied {
                Ok(_) => {}
                Err(StoreError::ConditionFailed(_)) => {
                    debug!(proposal_id = %proposal.id, "Transition already applied");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            info!(
                proposal_id = %proposal.id,
                from = proposal.status.as_str(),
                to = transition.to.as_str(),
                quorum_met = ?transition.quorum_met,
                "Proposal transitioned"
            );

            // A config-change proposal that dies releases its draft to the
            // archive rather than leaving it locked forever.
            if matches!(
                transition.to,
                ProposalStatus::Rejected | ProposalStatus::Expired
            ) {
                if let Some(design_id) = proposal.design_id {
                    self.archive_design(design_id, proposal.id, now).await;
                }
            }

            outcomes.push(TickOutcome {
                proposal_id: proposal.id,
                from: proposal.status,
                to: transition.to,
                quorum_met: transition.quorum_met,
            });
        }

        Ok(outcomes)
    }

    async fn archive_design(&self, design_id: Uuid, proposal_id: Uuid, now: DateTime<Utc>) {
        match self.designs.design(design_id).await {
            Ok(Some(mut design))
                if design.status == DesignStatus::Draft
                    && design.submitted_proposal_id == Some(proposal_id) =>
            {
                design.status = DesignStatus::Archived;
                design.updated_at = now;
                if let Err(e) = self.designs.update_design(design).await {
                    warn!(design_id = %design_id, error = %e, "Failed to archive design");
                }
            }
            Ok(_) => {}
            Err(e) => warn!(design_id = %design_id, error = %e, "Failed to load design"),
        }
    }

    /// All proposals in the actor's community, newest first.
    pub async fn community_proposals(&self, actor: Uuid) -> Result<Vec<Proposal>> {
        let member = self.require_member(actor).await?;
        Ok(self
            .proposals
            .community_proposals(member.community_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;
    use crate::types::ProposalCategory;
    use rulebook::types::{DesignChildren, GameDesign};

    fn member(community_id: Uuid, standing: u8) -> Member {
        Member {
            id: Uuid::new_v4(),
            community_id,
            display_name: format!("member-{}", standing),
            standing,
        }
    }

    fn proposal_input() -> NewProposal {
        NewProposal {
            title: "Lower the quest cooldown".to_string(),
            description: "The current cooldown discourages daily participation.".to_string(),
            category: ProposalCategory::ThresholdChange,
            vote_type: VoteType::Quadratic,
            design_id: None,
            deliberation_days: None,
            voting_days: None,
            quorum: None,
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        engine: ProposalEngine,
        keeper: Member,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let keeper = member(Uuid::new_v4(), 4);
        store.add_member(keeper.clone()).await;
        let engine = ProposalEngine::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
            GovernanceConfig::default(),
        );
        Fixture {
            store,
            clock,
            engine,
            keeper,
        }
    }

    async fn voting_proposal(fx: &Fixture, quorum: u64) -> Proposal {
        let mut input = proposal_input();
        input.quorum = Some(quorum);
        let proposal = fx.engine.create(fx.keeper.id, input).await.unwrap();
        fx.engine.submit(fx.keeper.id, proposal.id).await.unwrap();
        fx.clock.advance(Duration::days(7));
        fx.engine.tick().await.unwrap();
        fx.engine
            .community_proposals(fx.keeper.id)
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.id == proposal.id)
            .unwrap()
    }

    #[test]
    fn test_quadratic_weight_bounds() {
        let policy = VotingPolicy::default();

        let mut previous = 0;
        for credits in 1..=100 {
            let weight = vote_weight(VoteType::Quadratic, credits, &policy).unwrap();
            assert!(weight >= previous, "weight decreased at {} credits", credits);
            previous = weight;
        }

        let one = vote_weight(VoteType::Quadratic, 1, &policy).unwrap();
        let hundred = vote_weight(VoteType::Quadratic, 100, &policy).unwrap();
        assert_eq!(one, 1);
        assert_eq!(hundred, 10);
        assert_eq!(hundred / one, 10); // never 100

        assert!(vote_weight(VoteType::Quadratic, 0, &policy).is_err());
        assert!(vote_weight(VoteType::Quadratic, 101, &policy).is_err());
    }

    #[test]
    fn test_approval_weight_is_constant() {
        let policy = VotingPolicy::default();
        for credits in [1, 25, 100] {
            assert_eq!(vote_weight(VoteType::Approval, credits, &policy).unwrap(), 1);
        }
    }

    #[test]
    fn test_next_status_quorum_gate() {
        let now = Utc::now();
        let proposal = Proposal {
            id: Uuid::new_v4(),
            community_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "Quorum gate".to_string(),
            description: "Majority in favor but below quorum".to_string(),
            category: ProposalCategory::Other,
            vote_type: VoteType::Approval,
            status: ProposalStatus::Voting,
            votes_for: 3,
            votes_against: 0,
            quorum: 5,
            design_id: None,
            deliberation_days: 7,
            voting_days: 7,
            deliberation_ends_at: None,
            voting_ends_at: Some(now - Duration::hours(1)),
            created_at: now - Duration::days(14),
        };

        let transition = next_status(&proposal, now, 90).unwrap();
        assert_eq!(transition.to, ProposalStatus::Rejected);
        assert_eq!(transition.quorum_met, Some(false));
    }

    #[test]
    fn test_next_status_terminal_is_noop() {
        let now = Utc::now();
        for status in [
            ProposalStatus::Passed,
            ProposalStatus::Rejected,
            ProposalStatus::Expired,
        ] {
            let proposal = Proposal {
                id: Uuid::new_v4(),
                community_id: Uuid::new_v4(),
                author_id: Uuid::new_v4(),
                title: "Terminal".to_string(),
                description: "Terminal proposals never transition".to_string(),
                category: ProposalCategory::Other,
                vote_type: VoteType::Approval,
                status,
                votes_for: 10,
                votes_against: 0,
                quorum: 5,
                design_id: None,
                deliberation_days: 7,
                voting_days: 7,
                deliberation_ends_at: None,
                voting_ends_at: Some(now - Duration::days(30)),
                created_at: now - Duration::days(400),
            };
            assert!(next_status(&proposal, now, 90).is_none());
        }
    }

    #[tokio::test]
    async fn test_lifecycle_draft_to_passed() {
        let fx = fixture().await;
        let proposal = fx.engine.create(fx.keeper.id, proposal_input()).await.unwrap();
        assert_eq!(proposal.status, ProposalStatus::Draft);

        let submitted = fx.engine.submit(fx.keeper.id, proposal.id).await.unwrap();
        assert_eq!(submitted.status, ProposalStatus::Deliberation);
        assert!(submitted.deliberation_ends_at.is_some());

        // Deliberation runs its course.
        fx.clock.advance(Duration::days(7));
        let outcomes = fx.engine.tick().await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].to, ProposalStatus::Voting);

        // Quorum of 5 approval votes in favor.
        for _ in 0..5 {
            let voter = member(fx.keeper.community_id, 2);
            fx.store.add_member(voter.clone()).await;
            fx.engine
                .cast_vote(voter.id, proposal.id, true, 1)
                .await
                .unwrap();
        }

        fx.clock.advance(Duration::days(7));
        let outcomes = fx.engine.tick().await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].to, ProposalStatus::Passed);
        assert_eq!(outcomes[0].quorum_met, Some(true));

        // A second sweep finds nothing to do.
        assert!(fx.engine.tick().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_double_vote_rejected() {
        let fx = fixture().await;
        let proposal = voting_proposal(&fx, 5).await;

        let voter = member(fx.keeper.community_id, 2);
        fx.store.add_member(voter.clone()).await;

        fx.engine
            .cast_vote(voter.id, proposal.id, true, 9)
            .await
            .unwrap();
        let err = fx
            .engine
            .cast_vote(voter.id, proposal.id, false, 4)
            .await
            .unwrap_err();
        assert!(matches!(err, GovernanceError::AlreadyVoted));

        // Tally reflects exactly one vote of weight 3.
        let current = fx
            .engine
            .community_proposals(fx.keeper.id)
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.id == proposal.id)
            .unwrap();
        assert_eq!(current.votes_for, 3);
        assert_eq!(current.votes_against, 0);
    }

    #[tokio::test]
    async fn test_vote_outside_voting_phase_rejected() {
        let fx = fixture().await;
        let proposal = fx.engine.create(fx.keeper.id, proposal_input()).await.unwrap();
        fx.engine.submit(fx.keeper.id, proposal.id).await.unwrap();

        let voter = member(fx.keeper.community_id, 2);
        fx.store.add_member(voter.clone()).await;

        // Still in deliberation.
        let err = fx
            .engine
            .cast_vote(voter.id, proposal.id, true, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn test_low_standing_cannot_vote() {
        let fx = fixture().await;
        let proposal = voting_proposal(&fx, 5).await;

        let newcomer = member(fx.keeper.community_id, 1);
        fx.store.add_member(newcomer.clone()).await;

        let err = fx
            .engine
            .cast_vote(newcomer.id, proposal.id, true, 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::InsufficientStanding { required: 2 }
        ));
    }

    #[tokio::test]
    async fn test_quorum_gate_rejects_at_deadline() {
        let fx = fixture().await;
        let proposal = voting_proposal(&fx, 5).await;

        // Three in favor, none against — majority but no quorum.
        for _ in 0..3 {
            let voter = member(fx.keeper.community_id, 2);
            fx.store.add_member(voter.clone()).await;
            fx.engine
                .cast_vote(voter.id, proposal.id, true, 1)
                .await
                .unwrap();
        }

        fx.clock.advance(Duration::days(7));
        let outcomes = fx.engine.tick().await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].to, ProposalStatus::Rejected);
        assert_eq!(outcomes[0].quorum_met, Some(false));
    }

    #[tokio::test]
    async fn test_abandoned_draft_proposal_expires() {
        let fx = fixture().await;
        let proposal = fx.engine.create(fx.keeper.id, proposal_input()).await.unwrap();

        fx.clock.advance(Duration::days(91));
        let outcomes = fx.engine.tick().await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].proposal_id, proposal.id);
        assert_eq!(outcomes[0].to, ProposalStatus::Expired);
    }

    #[tokio::test]
    async fn test_submit_rejects_guardrail_violations() {
        let fx = fixture().await;
        let now = fx.clock.now();

        // A draft that sunsets too soon and has no recognition tiers.
        let design = GameDesign {
            id: Uuid::new_v4(),
            community_id: fx.keeper.community_id,
            name: "Rushed".to_string(),
            description: None,
            value_statement: "We value speed".to_string(),
            design_rationale: "Written in a hurry".to_string(),
            status: rulebook::types::DesignStatus::Draft,
            version: 1,
            created_by: fx.keeper.id,
            submitted_proposal_id: None,
            sunset_at: now + Duration::days(10),
            created_at: now,
            updated_at: now,
        };
        let design_id = design.id;
        fx.store
            .insert_design(design, DesignChildren::default())
            .await
            .unwrap();

        let proposal = fx
            .engine
            .create(
                fx.keeper.id,
                NewProposal {
                    title: "Adopt the rushed design".to_string(),
                    description: "This design violates several guardrails.".to_string(),
                    category: ProposalCategory::GameDesign,
                    vote_type: VoteType::Approval,
                    design_id: Some(design_id),
                    deliberation_days: None,
                    voting_days: None,
                    quorum: None,
                },
            )
            .await
            .unwrap();

        let err = fx.engine.submit(fx.keeper.id, proposal.id).await.unwrap_err();
        assert!(matches!(err, GovernanceError::Guardrail(_)));

        // The draft was not locked and the proposal did not advance.
        let design = fx.store.design(design_id).await.unwrap().unwrap();
        assert!(design.submitted_proposal_id.is_none());
        let proposal = fx.store.proposal(proposal.id).await.unwrap().unwrap();
        assert_eq!(proposal.status, ProposalStatus::Draft);
    }

    #[tokio::test]
    async fn test_cross_community_proposal_is_not_found() {
        let fx = fixture().await;
        let proposal = voting_proposal(&fx, 5).await;

        let outsider = member(Uuid::new_v4(), 5);
        fx.store.add_member(outsider.clone()).await;

        let err = fx
            .engine
            .cast_vote(outsider.id, proposal.id, true, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, GovernanceError::NotFound(_)));
    }
}
