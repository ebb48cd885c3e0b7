//! Community Ruleset as Data
//!
//! A community's gameplay rules — quest types, skill domains, recognition
//! tiers, recognition sources — are rows, not code. This crate holds the
//! domain model and the pure operations over it:
//!
//! - [`GameDesign`] and its four child collections, versioned per community
//! - [`GameConfig`]: the resolved, read-only snapshot the application consumes
//! - [`guardrails`]: platform limits no community design may override
//! - [`DesignTemplate`]: pre-built rulesets a draft can be seeded from
//! - [`diff`]: membership diff between a draft and the active config
//!
//! Storage, drafting, and the governance lifecycle that turns a draft into
//! the active config live in the `governance` crate.

pub mod config;
pub mod diff;
pub mod guardrails;
pub mod template;
pub mod types;

// Re-export main types
pub use config::GameConfig;
pub use diff::{diff, CollectionDiff, DesignDiff};
pub use guardrails::GuardrailViolation;
pub use template::{
    DesignTemplate, QuestTypeSeed, RecognitionSourceSeed, RecognitionTierSeed, SkillDomainSeed,
    TemplateConfig,
};
pub use types::*;
