//! Configuration for the governance engines.

use serde::{Deserialize, Serialize};

/// Bounds on the deliberation phase length, in days.
pub const DELIBERATION_DAYS_RANGE: (u32, u32) = (3, 30);
/// Bounds on the voting phase length, in days.
pub const VOTING_DAYS_RANGE: (u32, u32) = (3, 14);

/// Configuration for governance in one community.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Proposal lifecycle policy
    pub proposals: ProposalPolicy,
    /// Vote casting policy
    pub voting: VotingPolicy,
    /// Config resolver policy
    pub resolver: ResolverPolicy,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            proposals: ProposalPolicy::default(),
            voting: VotingPolicy::default(),
            resolver: ResolverPolicy::default(),
        }
    }
}

impl GovernanceConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Proposal lifecycle policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalPolicy {
    /// Default deliberation phase length (days)
    pub deliberation_days: u32,
    /// Default voting phase length (days)
    pub voting_days: u32,
    /// Default quorum when a proposal does not set one
    pub default_quorum: u64,
    /// Days a draft proposal may sit unsubmitted before expiring
    pub max_lifetime_days: u32,
    /// Minimum standing tier to create proposals and manage designs (Keeper)
    pub proposer_standing: u8,
}

impl Default for ProposalPolicy {
    fn default() -> Self {
        Self {
            deliberation_days: 7,
            voting_days: 7,
            default_quorum: 5,
            max_lifetime_days: 90,
            proposer_standing: 4,
        }
    }
}

/// Vote casting policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingPolicy {
    /// Minimum credits per vote
    pub min_credits: u32,
    /// Maximum credits per vote
    pub max_credits: u32,
    /// Minimum standing tier to vote (Neighbor)
    pub voter_standing: u8,
}

impl Default for VotingPolicy {
    fn default() -> Self {
        Self {
            min_credits: 1,
            max_credits: 100,
            voter_standing: 2,
        }
    }
}

/// Config resolver policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverPolicy {
    /// Resolved-config cache TTL (seconds)
    pub cache_ttl_secs: u64,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self { cache_ttl_secs: 300 }
    }
}
