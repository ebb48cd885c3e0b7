//! Community Rule-Change Governance
//!
//! Turning a draft ruleset into the live one takes a governance proposal:
//! deliberation, quorum-gated weighted voting, and an atomic activation
//! swap. This crate owns that pipeline:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  DraftEngine ──▶ ProposalEngine ──▶ Activator               │
//! │   fork/edit       submit · vote       archive + promote     │
//! │       │            · tick()                │                │
//! │       ▼                                    ▼                │
//! │  DesignStore / ProposalStore  ◀──  ConfigResolver (cache)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **Storage seams**: [`store::DesignStore`], [`store::ProposalStore`],
//!   [`store::MemberStore`], with [`store::MemoryStore`] as the reference
//!   backend
//! - **Deterministic time**: every deadline check goes through [`Clock`]
//! - **Race safety**: one vote per member enforced at the store, activation
//!   compare-and-swapped on a per-community version, `tick()` idempotent
//!   under overlapping invocations

pub mod activation;
pub mod clock;
pub mod config;
pub mod draft;
pub mod proposal;
pub mod resolver;
pub mod store;
pub mod types;

// Re-export main types
pub use activation::Activator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{GovernanceConfig, ProposalPolicy, ResolverPolicy, VotingPolicy};
pub use draft::{DraftEngine, DraftPatch};
pub use proposal::{next_status, vote_weight, PendingTransition, ProposalEngine, TickOutcome};
pub use resolver::ConfigResolver;
pub use types::*;
