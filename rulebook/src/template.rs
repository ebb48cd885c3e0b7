//! Design templates.
//!
//! A template is a named, pre-built ruleset a community can start a draft
//! from instead of forking its active design. The seed rows carry no ids;
//! [`TemplateConfig::seed_children`] materializes them into child rows owned
//! by a fresh draft.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::guardrails::{self, GuardrailViolation, MAX_RECOGNITION_TIERS};
use crate::types::{
    DesignChildren, QuestType, RecognitionSource, RecognitionTier, RecognitionType, SkillDomain,
    SourceType, ThresholdType, ValidationMethod, VisibilityDefault,
};

fn default_recognition_type() -> RecognitionType {
    RecognitionType::Xp
}

fn default_base_recognition() -> u32 {
    5
}

fn default_party_size() -> u32 {
    1
}

fn default_visibility() -> VisibilityDefault {
    VisibilityDefault::Private
}

fn default_threshold_type() -> ThresholdType {
    ThresholdType::Points
}

/// Seed row for a quest type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestTypeSeed {
    pub slug: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    pub validation_method: ValidationMethod,
    #[serde(default)]
    pub validation_threshold: u32,
    #[serde(default = "default_recognition_type")]
    pub recognition_type: RecognitionType,
    #[serde(default = "default_base_recognition")]
    pub base_recognition: u32,
    #[serde(default)]
    pub narrative_prompt: Option<String>,
    #[serde(default)]
    pub cooldown_hours: u32,
    #[serde(default = "default_party_size")]
    pub max_party_size: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl QuestTypeSeed {
    /// Field-level validation.
    pub fn validate(&self) -> Vec<GuardrailViolation> {
        let mut violations = Vec::new();
        if !guardrails::valid_slug(&self.slug) {
            violations.push(GuardrailViolation {
                field: "slug".to_string(),
                message: "Slug must be lowercase alphanumeric with dashes, 1-50 chars".to_string(),
            });
        }
        if self.label.is_empty() || self.label.len() > 100 {
            violations.push(GuardrailViolation {
                field: "label".to_string(),
                message: "Label must be 1-100 characters".to_string(),
            });
        }
        if self.description.as_ref().is_some_and(|d| d.len() > 500) {
            violations.push(GuardrailViolation {
                field: "description".to_string(),
                message: "Description must be at most 500 characters".to_string(),
            });
        }
        if self.validation_threshold > 100 {
            violations.push(GuardrailViolation {
                field: "validation_threshold".to_string(),
                message: "Validation threshold must be at most 100".to_string(),
            });
        }
        if self.base_recognition > 1000 {
            violations.push(GuardrailViolation {
                field: "base_recognition".to_string(),
                message: "Base recognition must be at most 1000".to_string(),
            });
        }
        if self.cooldown_hours > 168 {
            violations.push(GuardrailViolation {
                field: "cooldown_hours".to_string(),
                message: "Cooldown must be at most 168 hours".to_string(),
            });
        }
        if self.max_party_size < 1 || self.max_party_size > 10 {
            violations.push(GuardrailViolation {
                field: "max_party_size".to_string(),
                message: "Party size must be between 1 and 10".to_string(),
            });
        }
        violations
    }

    /// Materialize into a child row.
    pub fn materialize(&self, game_design_id: Uuid, sort_order: u32) -> QuestType {
        QuestType {
            id: Uuid::new_v4(),
            game_design_id,
            slug: self.slug.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            validation_method: self.validation_method,
            validation_threshold: self.validation_threshold,
            recognition_type: self.recognition_type,
            base_recognition: self.base_recognition,
            narrative_prompt: self.narrative_prompt.clone(),
            cooldown_hours: self.cooldown_hours,
            max_party_size: self.max_party_size,
            sort_order,
            color: self.color.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// Seed row for a skill domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDomainSeed {
    pub slug: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_visibility")]
    pub visibility_default: VisibilityDefault,
}

impl SkillDomainSeed {
    pub fn validate(&self) -> Vec<GuardrailViolation> {
        let mut violations = Vec::new();
        if !guardrails::valid_slug(&self.slug) {
            violations.push(GuardrailViolation {
                field: "slug".to_string(),
                message: "Slug must be lowercase alphanumeric with dashes, 1-50 chars".to_string(),
            });
        }
        if self.label.is_empty() || self.label.len() > 100 {
            violations.push(GuardrailViolation {
                field: "label".to_string(),
                message: "Label must be 1-100 characters".to_string(),
            });
        }
        if self.examples.len() > 10 || self.examples.iter().any(|e| e.len() > 100) {
            violations.push(GuardrailViolation {
                field: "examples".to_string(),
                message: "At most 10 examples of at most 100 characters each".to_string(),
            });
        }
        violations
    }

    pub fn materialize(&self, game_design_id: Uuid, sort_order: u32) -> SkillDomain {
        SkillDomain {
            id: Uuid::new_v4(),
            game_design_id,
            slug: self.slug.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            examples: self.examples.clone(),
            color: self.color.clone(),
            icon: self.icon.clone(),
            visibility_default: self.visibility_default,
            sort_order,
        }
    }
}

/// Seed row for a recognition tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionTierSeed {
    pub tier_number: u32,
    pub name: String,
    #[serde(default = "default_threshold_type")]
    pub threshold_type: ThresholdType,
    #[serde(default)]
    pub threshold_value: u32,
    #[serde(default)]
    pub additional_requirements: Option<serde_json::Value>,
    #[serde(default)]
    pub unlocks: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl RecognitionTierSeed {
    pub fn validate(&self) -> Vec<GuardrailViolation> {
        let mut violations = Vec::new();
        if self.tier_number < 1 || self.tier_number as usize > MAX_RECOGNITION_TIERS {
            violations.push(GuardrailViolation {
                field: "tier_number".to_string(),
                message: format!("Tier number must be between 1 and {}", MAX_RECOGNITION_TIERS),
            });
        }
        if self.name.is_empty() || self.name.len() > 50 {
            violations.push(GuardrailViolation {
                field: "name".to_string(),
                message: "Name must be 1-50 characters".to_string(),
            });
        }
        if self.threshold_value > 10_000 {
            violations.push(GuardrailViolation {
                field: "threshold_value".to_string(),
                message: "Threshold must be at most 10000".to_string(),
            });
        }
        if self.unlocks.len() > 10 || self.unlocks.iter().any(|u| u.len() > 200) {
            violations.push(GuardrailViolation {
                field: "unlocks".to_string(),
                message: "At most 10 unlocks of at most 200 characters each".to_string(),
            });
        }
        violations
    }

    pub fn materialize(&self, game_design_id: Uuid) -> RecognitionTier {
        RecognitionTier {
            id: Uuid::new_v4(),
            game_design_id,
            tier_number: self.tier_number,
            name: self.name.clone(),
            threshold_type: self.threshold_type,
            threshold_value: self.threshold_value,
            additional_requirements: self.additional_requirements.clone(),
            unlocks: self.unlocks.clone(),
            color: self.color.clone(),
        }
    }
}

/// Seed row for a recognition source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionSourceSeed {
    pub source_type: SourceType,
    pub amount: f32,
    #[serde(default)]
    pub max_per_day: Option<u32>,
}

impl RecognitionSourceSeed {
    pub fn validate(&self) -> Vec<GuardrailViolation> {
        guardrails::validate_source_amount(self.amount, self.max_per_day)
    }

    pub fn materialize(&self, game_design_id: Uuid) -> RecognitionSource {
        RecognitionSource {
            id: Uuid::new_v4(),
            game_design_id,
            source_type: self.source_type,
            amount: self.amount,
            max_per_day: self.max_per_day,
        }
    }
}

/// The seed collections of a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub quest_types: Vec<QuestTypeSeed>,
    #[serde(default)]
    pub skill_domains: Vec<SkillDomainSeed>,
    #[serde(default)]
    pub recognition_tiers: Vec<RecognitionTierSeed>,
    #[serde(default)]
    pub recognition_sources: Vec<RecognitionSourceSeed>,
}

impl TemplateConfig {
    /// Validate every seed row. Returns one message per violation,
    /// prefixed with the row's position and natural key.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (i, qt) in self.quest_types.iter().enumerate() {
            for v in qt.validate() {
                errors.push(format!("Quest type {} ({}): {}", i, qt.slug, v.message));
            }
        }
        for (i, sd) in self.skill_domains.iter().enumerate() {
            for v in sd.validate() {
                errors.push(format!("Skill domain {} ({}): {}", i, sd.slug, v.message));
            }
        }
        for (i, rt) in self.recognition_tiers.iter().enumerate() {
            for v in rt.validate() {
                errors.push(format!("Recognition tier {} ({}): {}", i, rt.name, v.message));
            }
        }
        for (i, rs) in self.recognition_sources.iter().enumerate() {
            for v in rs.validate() {
                errors.push(format!(
                    "Recognition source {} ({}): {}",
                    i,
                    rs.source_type.as_str(),
                    v.message
                ));
            }
        }

        errors
    }

    /// Materialize all seed rows for a new draft design.
    pub fn seed_children(&self, game_design_id: Uuid) -> DesignChildren {
        debug!(
            design_id = %game_design_id,
            quest_types = self.quest_types.len(),
            skill_domains = self.skill_domains.len(),
            "Seeding design children from template"
        );

        DesignChildren {
            quest_types: self
                .quest_types
                .iter()
                .enumerate()
                .map(|(i, qt)| qt.materialize(game_design_id, i as u32))
                .collect(),
            skill_domains: self
                .skill_domains
                .iter()
                .enumerate()
                .map(|(i, sd)| sd.materialize(game_design_id, i as u32))
                .collect(),
            recognition_tiers: self
                .recognition_tiers
                .iter()
                .map(|rt| rt.materialize(game_design_id))
                .collect(),
            recognition_sources: self
                .recognition_sources
                .iter()
                .map(|rs| rs.materialize(game_design_id))
                .collect(),
        }
    }
}

/// A named, pre-built ruleset a community can start from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignTemplate {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Stable slug
    pub slug: String,
    /// Description shown in the template picker
    pub description: Option<String>,
    /// Suggested value statement
    pub value_statement: String,
    /// Seed collections
    pub config: TemplateConfig,
}

impl DesignTemplate {
    /// Load a template from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
