//! Storage seam for the governance engines.
//!
//! The engines talk to storage only through these traits. Single-row
//! operations are assumed synchronously consistent; the multi-row invariants
//! (vote insert + tally increment, archive + promote on activation) are
//! expressed as dedicated conditional operations so a relational backend can
//! map them onto transactions or conditional updates.

mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::{
    DesignStore, MemberStore, ProposalStore, StoreError, StoreResult, TemplateStore,
};
