//! Platform guardrails for game designs.
//!
//! These limits are immutable — no community design can override them. They
//! bound complexity (collection sizes), enforce periodic ruleset review
//! (sunset window), and cap recognition farming.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Maximum quest types per design.
pub const MAX_QUEST_TYPES: usize = 20;
/// Maximum skill domains per design.
pub const MAX_SKILL_DOMAINS: usize = 15;
/// Maximum recognition tiers per design.
pub const MAX_RECOGNITION_TIERS: usize = 7;
/// Minimum recognition tiers per design.
pub const MIN_RECOGNITION_TIERS: usize = 2;

/// A design must sunset at least this many days out.
pub const MIN_SUNSET_DAYS: i64 = 90;
/// A design cannot sunset more than this many days out.
pub const MAX_SUNSET_DAYS: i64 = 365 * 2;

/// Hard cap on daily recognition points from any single source.
pub const MAX_RECOGNITION_PER_DAY: u32 = 500;

/// A guardrail the design violates. A value, not an error — callers decide
/// whether to reject or report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailViolation {
    /// Which field or collection is out of bounds
    pub field: String,
    /// Human-readable explanation
    pub message: String,
}

impl GuardrailViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Check a slug: lowercase alphanumeric with dashes, 1..=50 chars.
pub fn valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 50
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Validate design-level guardrails at submission time.
pub fn validate_design(
    sunset_at: DateTime<Utc>,
    now: DateTime<Utc>,
    quest_type_count: usize,
    skill_domain_count: usize,
    recognition_tier_count: usize,
) -> Vec<GuardrailViolation> {
    let mut violations = Vec::new();

    if sunset_at < now + Duration::days(MIN_SUNSET_DAYS) {
        violations.push(GuardrailViolation::new(
            "sunset_at",
            format!("Design must last at least {} days", MIN_SUNSET_DAYS),
        ));
    }
    if sunset_at > now + Duration::days(MAX_SUNSET_DAYS) {
        violations.push(GuardrailViolation::new(
            "sunset_at",
            format!("Design cannot exceed {} days", MAX_SUNSET_DAYS),
        ));
    }

    if quest_type_count > MAX_QUEST_TYPES {
        violations.push(GuardrailViolation::new(
            "quest_types",
            format!("Maximum {} quest types allowed", MAX_QUEST_TYPES),
        ));
    }
    if skill_domain_count > MAX_SKILL_DOMAINS {
        violations.push(GuardrailViolation::new(
            "skill_domains",
            format!("Maximum {} skill domains allowed", MAX_SKILL_DOMAINS),
        ));
    }
    if recognition_tier_count < MIN_RECOGNITION_TIERS {
        violations.push(GuardrailViolation::new(
            "recognition_tiers",
            format!("At least {} recognition tiers required", MIN_RECOGNITION_TIERS),
        ));
    }
    if recognition_tier_count > MAX_RECOGNITION_TIERS {
        violations.push(GuardrailViolation::new(
            "recognition_tiers",
            format!("Maximum {} recognition tiers allowed", MAX_RECOGNITION_TIERS),
        ));
    }

    violations
}

/// Validate a recognition source's amount and daily cap.
pub fn validate_source_amount(amount: f32, max_per_day: Option<u32>) -> Vec<GuardrailViolation> {
    let mut violations = Vec::new();

    if amount < 0.0 {
        violations.push(GuardrailViolation::new(
            "amount",
            "Recognition amount cannot be negative",
        ));
    }
    if let Some(cap) = max_per_day {
        if cap > MAX_RECOGNITION_PER_DAY {
            violations.push(GuardrailViolation::new(
                "max_per_day",
                format!("Daily recognition cap cannot exceed {}", MAX_RECOGNITION_PER_DAY),
            ));
        }
    }

    violations
}
