//! Draft engine.
//!
//! Creates game design drafts (from a template or by forking the active
//! config), mutates child collections while the draft is open, and enforces
//! the locked-once-submitted invariant. Only the creator may edit a draft;
//! any member of the same community may view it, while cross-community
//! access reports `NotFound` so other communities' drafts cannot be
//! enumerated.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;
use uuid::Uuid;

use rulebook::guardrails::{
    MAX_QUEST_TYPES, MAX_RECOGNITION_TIERS, MAX_SKILL_DOMAINS, MIN_RECOGNITION_TIERS,
};
use rulebook::template::{
    DesignTemplate, QuestTypeSeed, RecognitionSourceSeed, RecognitionTierSeed, SkillDomainSeed,
};
use rulebook::types::{DesignChildren, DesignStatus, GameDesign};
use rulebook::{diff, DesignDiff, GameConfig};

use crate::clock::Clock;
use crate::config::GovernanceConfig;
use crate::store::{DesignStore, MemberStore, TemplateStore};
use crate::types::{GovernanceError, Member, Result};

/// Partial update of a draft's header fields.
#[derive(Debug, Clone, Default)]
pub struct DraftPatch {
    /// New name
    pub name: Option<String>,
    /// New description; `Some(None)` clears it
    pub description: Option<Option<String>>,
    /// New value statement
    pub value_statement: Option<String>,
    /// New design rationale
    pub design_rationale: Option<String>,
    /// New sunset date
    pub sunset_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Creates and mutates game design drafts.
pub struct DraftEngine {
    designs: Arc<dyn DesignStore>,
    templates: Arc<dyn TemplateStore>,
    members: Arc<dyn MemberStore>,
    clock: Arc<dyn Clock>,
    config: GovernanceConfig,
}

impl DraftEngine {
    /// Create a draft engine.
    pub fn new(
        designs: Arc<dyn DesignStore>,
        templates: Arc<dyn TemplateStore>,
        members: Arc<dyn MemberStore>,
        clock: Arc<dyn Clock>,
        config: GovernanceConfig,
    ) -> Self {
        Self {
            designs,
            templates,
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

    async fn require_proposer(&self, actor: Uuid) -> Result<Member> {
        let member = self.require_member(actor).await?;
        let required = self.config.proposals.proposer_standing;
        if !member.has_standing(required) {
            return Err(GovernanceError::InsufficientStanding { required });
        }
        Ok(member)
    }

    /// Load a design visible to the actor. Cross-community access is
    /// indistinguishable from a missing design.
    async fn visible_design(&self, actor: Uuid, design_id: Uuid) -> Result<(Member, GameDesign)> {
        let member = self.require_member(actor).await?;
        let design = self
            .designs
            .design(design_id)
            .await?
            .filter(|d| d.community_id == member.community_id)
            .ok_or(GovernanceError::NotFound("Game design"))?;
        Ok((member, design))
    }

    /// Load a design the actor may edit: same community, creator, unlocked
    /// draft.
    async fn editable_draft(&self, actor: Uuid, design_id: Uuid) -> Result<GameDesign> {
        let (member, design) = self.visible_design(actor, design_id).await?;
        if design.created_by != member.id {
            return Err(GovernanceError::NotOwner);
        }
        if design.status != DesignStatus::Draft || design.submitted_proposal_id.is_some() {
            return Err(GovernanceError::DraftLocked);
        }
        Ok(design)
    }

    /// Apply a closure to an editable draft's children and persist the
    /// result, bumping the design's updated timestamp.
    async fn mutate_children<F, R>(&self, actor: Uuid, design_id: Uuid, f: F) -> Result<R>
    where
        F: FnOnce(&mut DesignChildren) -> Result<R>,
    {
        let mut design = self.editable_draft(actor, design_id).await?;
        let mut children = self.designs.children(design.id).await?;
        let out = f(&mut children)?;
        self.designs.update_children(design.id, children).await?;
        design.updated_at = self.clock.now();
        self.designs.update_design(design).await?;
        Ok(out)
    }

    /// Clone a template's collections into a new draft design.
    pub async fn create_from_template(&self, actor: Uuid, template_id: Uuid) -> Result<Uuid> {
        let member = self.require_proposer(actor).await?;

        let template = self
            .templates
            .template(template_id)
            .await?
            .ok_or(GovernanceError::NotFound("Template"))?;

        let errors = template.config.validate();
        if !errors.is_empty() {
            return Err(GovernanceError::Guardrail(errors.join("; ")));
        }

        let now = self.clock.now();
        let design = GameDesign {
            id: Uuid::new_v4(),
            community_id: member.community_id,
            name: format!("{} (Draft)", template.name),
            description: template.description.clone(),
            value_statement: template.value_statement.clone(),
            design_rationale: format!(
                "Based on the {} template. Edit this to describe why your community chose these rules.",
                template.name
            ),
            status: DesignStatus::Draft,
            version: 1,
            created_by: member.id,
            submitted_proposal_id: None,
            sunset_at: now + Duration::days(365),
            created_at: now,
            updated_at: now,
        };
        let design_id = design.id;
        let children = template.config.seed_children(design_id);
        self.designs.insert_design(design, children).await?;

        info!(
            design_id = %design_id,
            template = %template.slug,
            community_id = %member.community_id,
            "Created draft from template"
        );
        Ok(design_id)
    }

    /// Fork the community's active design into a new draft, deep-copying
    /// all four collections.
    pub async fn fork_active(&self, actor: Uuid) -> Result<Uuid> {
        let member = self.require_proposer(actor).await?;

        let active = self
            .designs
            .active_design(member.community_id)
            .await?
            .ok_or(GovernanceError::NoActiveConfig)?;
        let children = self.designs.children(active.id).await?;

        let now = self.clock.now();
        let design = GameDesign {
            id: Uuid::new_v4(),
            community_id: member.community_id,
            name: format!("{} (Fork)", active.name),
            description: active.description.clone(),
            value_statement: active.value_statement.clone(),
            design_rationale: active.design_rationale.clone(),
            status: DesignStatus::Draft,
            version: active.version + 1,
            created_by: member.id,
            submitted_proposal_id: None,
            sunset_at: now + Duration::days(365),
            created_at: now,
            updated_at: now,
        };
        let design_id = design.id;
        self.designs
            .insert_design(design, children.fork_for(design_id))
            .await?;

        info!(
            design_id = %design_id,
            forked_from = %active.id,
            community_id = %member.community_id,
            "Forked active design"
        );
        Ok(design_id)
    }

    /// View a design and its children. Any member of the design's community.
    pub async fn design(&self, actor: Uuid, design_id: Uuid) -> Result<(GameDesign, DesignChildren)> {
        let (_, design) = self.visible_design(actor, design_id).await?;
        let children = self.designs.children(design.id).await?;
        Ok((design, children))
    }

    /// List the community's drafts, newest first.
    pub async fn drafts(&self, actor: Uuid) -> Result<Vec<GameDesign>> {
        let member = self.require_member(actor).await?;
        Ok(self.designs.community_drafts(member.community_id).await?)
    }

    /// List the available design templates.
    pub async fn templates(&self, actor: Uuid) -> Result<Vec<DesignTemplate>> {
        self.require_member(actor).await?;
        Ok(self.templates.templates().await?)
    }

    /// Structural diff of a draft against the community's active config.
    ///
    /// Fails with [`GovernanceError::NoActiveConfig`] when there is nothing
    /// to compare against.
    pub async fn diff_against_active(&self, actor: Uuid, design_id: Uuid) -> Result<DesignDiff> {
        let (_, design) = self.visible_design(actor, design_id).await?;
        let children = self.designs.children(design.id).await?;
        let draft_config = GameConfig::from_parts(&design, children);

        let active = self
            .designs
            .active_design(design.community_id)
            .await?
            .ok_or(GovernanceError::NoActiveConfig)?;
        let active_children = self.designs.children(active.id).await?;
        let active_config = GameConfig::from_parts(&active, active_children);

        Ok(diff(&draft_config, &active_config))
    }

    /// Update a draft's header fields.
    pub async fn update_draft(&self, actor: Uuid, design_id: Uuid, patch: DraftPatch) -> Result<()> {
        if let Some(name) = &patch.name {
            if name.len() < 3 || name.len() > 100 {
                return Err(GovernanceError::InvalidInput(
                    "Name must be 3-100 characters".to_string(),
                ));
            }
        }
        if let Some(Some(description)) = &patch.description {
            if description.len() > 1000 {
                return Err(GovernanceError::InvalidInput(
                    "Description must be at most 1000 characters".to_string(),
                ));
            }
        }
        if let Some(statement) = &patch.value_statement {
            if statement.len() < 10 || statement.len() > 2000 {
                return Err(GovernanceError::InvalidInput(
                    "Value statement must be 10-2000 characters".to_string(),
                ));
            }
        }
        if let Some(rationale) = &patch.design_rationale {
            if rationale.len() < 10 || rationale.len() > 5000 {
                return Err(GovernanceError::InvalidInput(
                    "Design rationale must be 10-5000 characters".to_string(),
                ));
            }
        }

        let mut design = self.editable_draft(actor, design_id).await?;
        if let Some(name) = patch.name {
            design.name = name;
        }
        if let Some(description) = patch.description {
            design.description = description;
        }
        if let Some(statement) = patch.value_statement {
            design.value_statement = statement;
        }
        if let Some(rationale) = patch.design_rationale {
            design.design_rationale = rationale;
        }
        if let Some(sunset_at) = patch.sunset_at {
            design.sunset_at = sunset_at;
        }
        design.updated_at = self.clock.now();
        Ok(self.designs.update_design(design).await?)
    }

    /// Archive an unsubmitted draft.
    pub async fn abandon(&self, actor: Uuid, design_id: Uuid) -> Result<()> {
        let mut design = self.editable_draft(actor, design_id).await?;
        design.status = DesignStatus::Archived;
        design.updated_at = self.clock.now();
        self.designs.update_design(design).await?;
        info!(design_id = %design_id, "Draft abandoned");
        Ok(())
    }

    fn first_violation(violations: Vec<rulebook::GuardrailViolation>) -> Result<()> {
        match violations.into_iter().next() {
            Some(v) => Err(GovernanceError::InvalidInput(v.message)),
            None => Ok(()),
        }
    }

    /// Add a quest type to a draft.
    pub async fn add_quest_type(
        &self,
        actor: Uuid,
        design_id: Uuid,
        seed: QuestTypeSeed,
    ) -> Result<Uuid> {
        Self::first_violation(seed.validate())?;
        self.mutate_children(actor, design_id, |children| {
            if children.quest_types.len() >= MAX_QUEST_TYPES {
                return Err(GovernanceError::Guardrail(format!(
                    "Maximum {} quest types allowed",
                    MAX_QUEST_TYPES
                )));
            }
            if children.quest_types.iter().any(|qt| qt.slug == seed.slug) {
                return Err(GovernanceError::InvalidInput(
                    "A quest type with this slug already exists".to_string(),
                ));
            }
            let sort_order = children.quest_types.len() as u32;
            let row = seed.materialize(design_id, sort_order);
            let id = row.id;
            children.quest_types.push(row);
            Ok(id)
        })
        .await
    }

    /// Replace a quest type's fields, keeping its id and position.
    pub async fn update_quest_type(
        &self,
        actor: Uuid,
        design_id: Uuid,
        quest_type_id: Uuid,
        seed: QuestTypeSeed,
    ) -> Result<()> {
        Self::first_violation(seed.validate())?;
        self.mutate_children(actor, design_id, |children| {
            if children
                .quest_types
                .iter()
                .any(|qt| qt.slug == seed.slug && qt.id != quest_type_id)
            {
                return Err(GovernanceError::InvalidInput(
                    "A quest type with this slug already exists".to_string(),
                ));
            }
            let existing = children
                .quest_types
                .iter_mut()
                .find(|qt| qt.id == quest_type_id)
                .ok_or(GovernanceError::NotFound("Quest type"))?;
            let mut row = seed.materialize(design_id, existing.sort_order);
            row.id = existing.id;
            *existing = row;
            Ok(())
        })
        .await
    }

    /// Remove a quest type from a draft.
    pub async fn remove_quest_type(
        &self,
        actor: Uuid,
        design_id: Uuid,
        quest_type_id: Uuid,
    ) -> Result<()> {
        self.mutate_children(actor, design_id, |children| {
            let before = children.quest_types.len();
            children.quest_types.retain(|qt| qt.id != quest_type_id);
            if children.quest_types.len() == before {
                return Err(GovernanceError::NotFound("Quest type"));
            }
            Ok(())
        })
        .await
    }

    /// Add a skill domain to a draft.
    pub async fn add_skill_domain(
        &self,
        actor: Uuid,
        design_id: Uuid,
        seed: SkillDomainSeed,
    ) -> Result<Uuid> {
        Self::first_violation(seed.validate())?;
        self.mutate_children(actor, design_id, |children| {
            if children.skill_domains.len() >= MAX_SKILL_DOMAINS {
                return Err(GovernanceError::Guardrail(format!(
                    "Maximum {} skill domains allowed",
                    MAX_SKILL_DOMAINS
                )));
            }
            if children.skill_domains.iter().any(|sd| sd.slug == seed.slug) {
                return Err(GovernanceError::InvalidInput(
                    "A skill domain with this slug already exists".to_string(),
                ));
            }
            let sort_order = children.skill_domains.len() as u32;
            let row = seed.materialize(design_id, sort_order);
            let id = row.id;
            children.skill_domains.push(row);
            Ok(id)
        })
        .await
    }

    /// Replace a skill domain's fields, keeping its id and position.
    pub async fn update_skill_domain(
        &self,
        actor: Uuid,
        design_id: Uuid,
        domain_id: Uuid,
        seed: SkillDomainSeed,
    ) -> Result<()> {
        Self::first_violation(seed.validate())?;
        self.mutate_children(actor, design_id, |children| {
            if children
                .skill_domains
                .iter()
                .any(|sd| sd.slug == seed.slug && sd.id != domain_id)
            {
                return Err(GovernanceError::InvalidInput(
                    "A skill domain with this slug already exists".to_string(),
                ));
            }
            let existing = children
                .skill_domains
                .iter_mut()
                .find(|sd| sd.id == domain_id)
                .ok_or(GovernanceError::NotFound("Skill domain"))?;
            let mut row = seed.materialize(design_id, existing.sort_order);
            row.id = existing.id;
            *existing = row;
            Ok(())
        })
        .await
    }

    /// Remove a skill domain from a draft.
    pub async fn remove_skill_domain(
        &self,
        actor: Uuid,
        design_id: Uuid,
        domain_id: Uuid,
    ) -> Result<()> {
        self.mutate_children(actor, design_id, |children| {
            let before = children.skill_domains.len();
            children.skill_domains.retain(|sd| sd.id != domain_id);
            if children.skill_domains.len() == before {
                return Err(GovernanceError::NotFound("Skill domain"));
            }
            Ok(())
        })
        .await
    }

    /// Add a recognition tier to a draft.
    pub async fn add_recognition_tier(
        &self,
        actor: Uuid,
        design_id: Uuid,
        seed: RecognitionTierSeed,
    ) -> Result<Uuid> {
        Self::first_violation(seed.validate())?;
        self.mutate_children(actor, design_id, |children| {
            if children.recognition_tiers.len() >= MAX_RECOGNITION_TIERS {
                return Err(GovernanceError::Guardrail(format!(
                    "Maximum {} recognition tiers allowed",
                    MAX_RECOGNITION_TIERS
                )));
            }
            if children
                .recognition_tiers
                .iter()
                .any(|rt| rt.tier_number == seed.tier_number)
            {
                return Err(GovernanceError::InvalidInput(
                    "A tier with this number already exists".to_string(),
                ));
            }
            let row = seed.materialize(design_id);
            let id = row.id;
            children.recognition_tiers.push(row);
            Ok(id)
        })
        .await
    }

    /// Replace a recognition tier's fields, keeping its id.
    pub async fn update_recognition_tier(
        &self,
        actor: Uuid,
        design_id: Uuid,
        tier_id: Uuid,
        seed: RecognitionTierSeed,
    ) -> Result<()> {
        Self::first_violation(seed.validate())?;
        self.mutate_children(actor, design_id, |children| {
            if children
                .recognition_tiers
                .iter()
                .any(|rt| rt.tier_number == seed.tier_number && rt.id != tier_id)
            {
                return Err(GovernanceError::InvalidInput(
                    "A tier with this number already exists".to_string(),
                ));
            }
            let existing = children
                .recognition_tiers
                .iter_mut()
                .find(|rt| rt.id == tier_id)
                .ok_or(GovernanceError::NotFound("Recognition tier"))?;
            let mut row = seed.materialize(design_id);
            row.id = existing.id;
            *existing = row;
            Ok(())
        })
        .await
    }

    /// Remove a recognition tier; the floor of two tiers is enforced.
    pub async fn remove_recognition_tier(
        &self,
        actor: Uuid,
        design_id: Uuid,
        tier_id: Uuid,
    ) -> Result<()> {
        self.mutate_children(actor, design_id, |children| {
            if children.recognition_tiers.len() <= MIN_RECOGNITION_TIERS {
                return Err(GovernanceError::Guardrail(format!(
                    "At least {} recognition tiers required",
                    MIN_RECOGNITION_TIERS
                )));
            }
            let before = children.recognition_tiers.len();
            children.recognition_tiers.retain(|rt| rt.id != tier_id);
            if children.recognition_tiers.len() == before {
                return Err(GovernanceError::NotFound("Recognition tier"));
            }
            Ok(())
        })
        .await
    }

    /// Replace the draft's recognition sources wholesale.
    pub async fn replace_recognition_sources(
        &self,
        actor: Uuid,
        design_id: Uuid,
        seeds: Vec<RecognitionSourceSeed>,
    ) -> Result<()> {
        for (i, seed) in seeds.iter().enumerate() {
            if let Some(v) = seed.validate().into_iter().next() {
                return Err(GovernanceError::InvalidInput(format!(
                    "Source {}: {}",
                    i + 1,
                    v.message
                )));
            }
        }
        let mut seen = Vec::new();
        for seed in &seeds {
            if seen.contains(&seed.source_type) {
                return Err(GovernanceError::InvalidInput(format!(
                    "Duplicate recognition source {}",
                    seed.source_type.as_str()
                )));
            }
            seen.push(seed.source_type);
        }

        self.mutate_children(actor, design_id, |children| {
            children.recognition_sources = seeds
                .iter()
                .map(|seed| seed.materialize(design_id))
                .collect();
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use rulebook::types::{RecognitionType, ValidationMethod, VisibilityDefault};

    fn quest_seed(slug: &str) -> QuestTypeSeed {
        QuestTypeSeed {
            slug: slug.to_string(),
            label: slug.to_string(),
            description: None,
            validation_method: ValidationMethod::SelfReport,
            validation_threshold: 0,
            recognition_type: RecognitionType::Xp,
            base_recognition: 5,
            narrative_prompt: None,
            cooldown_hours: 0,
            max_party_size: 1,
            color: None,
            icon: None,
        }
    }

    fn domain_seed(slug: &str) -> SkillDomainSeed {
        SkillDomainSeed {
            slug: slug.to_string(),
            label: slug.to_string(),
            description: None,
            examples: vec![],
            color: None,
            icon: None,
            visibility_default: VisibilityDefault::Private,
        }
    }

    fn starter_template() -> DesignTemplate {
        DesignTemplate {
            id: Uuid::new_v4(),
            name: "Starter".to_string(),
            slug: "starter".to_string(),
            description: None,
            value_statement: "Mutual aid first".to_string(),
            config: rulebook::TemplateConfig {
                quest_types: vec![quest_seed("cleanup")],
                skill_domains: vec![domain_seed("craft"), domain_seed("care")],
                recognition_tiers: vec![
                    RecognitionTierSeed {
                        tier_number: 1,
                        name: "Newcomer".to_string(),
                        threshold_type: rulebook::types::ThresholdType::Points,
                        threshold_value: 0,
                        additional_requirements: None,
                        unlocks: vec![],
                        color: None,
                    },
                    RecognitionTierSeed {
                        tier_number: 2,
                        name: "Neighbor".to_string(),
                        threshold_type: rulebook::types::ThresholdType::Points,
                        threshold_value: 50,
                        additional_requirements: None,
                        unlocks: vec![],
                        color: None,
                    },
                ],
                recognition_sources: vec![],
            },
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        engine: DraftEngine,
        keeper: Member,
        template_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let keeper = Member {
            id: Uuid::new_v4(),
            community_id: Uuid::new_v4(),
            display_name: "Keeper".to_string(),
            standing: 4,
        };
        store.add_member(keeper.clone()).await;
        let template = starter_template();
        let template_id = template.id;
        store.add_template(template).await;
        let engine = DraftEngine::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock,
            GovernanceConfig::default(),
        );
        Fixture {
            store,
            engine,
            keeper,
            template_id,
        }
    }

    #[tokio::test]
    async fn test_create_from_template_seeds_draft() {
        let fx = fixture().await;
        let design_id = fx
            .engine
            .create_from_template(fx.keeper.id, fx.template_id)
            .await
            .unwrap();

        let (design, children) = fx.engine.design(fx.keeper.id, design_id).await.unwrap();
        assert_eq!(design.status, DesignStatus::Draft);
        assert_eq!(design.name, "Starter (Draft)");
        assert_eq!(children.quest_types.len(), 1);
        assert_eq!(children.skill_domains.len(), 2);
        assert_eq!(children.recognition_tiers.len(), 2);
    }

    #[tokio::test]
    async fn test_low_standing_cannot_create() {
        let fx = fixture().await;
        let neighbor = Member {
            id: Uuid::new_v4(),
            community_id: fx.keeper.community_id,
            display_name: "Neighbor".to_string(),
            standing: 2,
        };
        fx.store.add_member(neighbor.clone()).await;

        let err = fx
            .engine
            .create_from_template(neighbor.id, fx.template_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::InsufficientStanding { required: 4 }
        ));
    }

    #[tokio::test]
    async fn test_fork_without_active_fails() {
        let fx = fixture().await;
        let err = fx.engine.fork_active(fx.keeper.id).await.unwrap_err();
        assert!(matches!(err, GovernanceError::NoActiveConfig));
    }

    #[tokio::test]
    async fn test_only_owner_edits() {
        let fx = fixture().await;
        let design_id = fx
            .engine
            .create_from_template(fx.keeper.id, fx.template_id)
            .await
            .unwrap();

        let other = Member {
            id: Uuid::new_v4(),
            community_id: fx.keeper.community_id,
            display_name: "Other".to_string(),
            standing: 5,
        };
        fx.store.add_member(other.clone()).await;

        // Same community: can view, cannot edit.
        assert!(fx.engine.design(other.id, design_id).await.is_ok());
        let err = fx
            .engine
            .add_quest_type(other.id, design_id, quest_seed("tutoring"))
            .await
            .unwrap_err();
        assert!(matches!(err, GovernanceError::NotOwner));
    }

    #[tokio::test]
    async fn test_cross_community_access_is_not_found() {
        let fx = fixture().await;
        let design_id = fx
            .engine
            .create_from_template(fx.keeper.id, fx.template_id)
            .await
            .unwrap();

        let outsider = Member {
            id: Uuid::new_v4(),
            community_id: Uuid::new_v4(),
            display_name: "Outsider".to_string(),
            standing: 5,
        };
        fx.store.add_member(outsider.clone()).await;

        let err = fx.engine.design(outsider.id, design_id).await.unwrap_err();
        assert!(matches!(err, GovernanceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_locked_draft_rejects_edits_even_from_owner() {
        let fx = fixture().await;
        let design_id = fx
            .engine
            .create_from_template(fx.keeper.id, fx.template_id)
            .await
            .unwrap();

        fx.store
            .lock_design(design_id, Uuid::new_v4(), Utc::now())
            .await
            .unwrap();

        let err = fx
            .engine
            .update_draft(
                fx.keeper.id,
                design_id,
                DraftPatch {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GovernanceError::DraftLocked));

        let err = fx
            .engine
            .add_quest_type(fx.keeper.id, design_id, quest_seed("tutoring"))
            .await
            .unwrap_err();
        assert!(matches!(err, GovernanceError::DraftLocked));
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let fx = fixture().await;
        let design_id = fx
            .engine
            .create_from_template(fx.keeper.id, fx.template_id)
            .await
            .unwrap();

        let err = fx
            .engine
            .add_quest_type(fx.keeper.id, design_id, quest_seed("cleanup"))
            .await
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_tier_floor_enforced() {
        let fx = fixture().await;
        let design_id = fx
            .engine
            .create_from_template(fx.keeper.id, fx.template_id)
            .await
            .unwrap();

        let (_, children) = fx.engine.design(fx.keeper.id, design_id).await.unwrap();
        let tier_id = children.recognition_tiers[0].id;

        let err = fx
            .engine
            .remove_recognition_tier(fx.keeper.id, design_id, tier_id)
            .await
            .unwrap_err();
        assert!(matches!(err, GovernanceError::Guardrail(_)));
    }

    #[tokio::test]
    async fn test_quest_type_cap_enforced() {
        let fx = fixture().await;
        let design_id = fx
            .engine
            .create_from_template(fx.keeper.id, fx.template_id)
            .await
            .unwrap();

        for i in 1..MAX_QUEST_TYPES {
            fx.engine
                .add_quest_type(fx.keeper.id, design_id, quest_seed(&format!("quest-{}", i)))
                .await
                .unwrap();
        }
        let err = fx
            .engine
            .add_quest_type(fx.keeper.id, design_id, quest_seed("one-too-many"))
            .await
            .unwrap_err();
        assert!(matches!(err, GovernanceError::Guardrail(_)));
    }
}
