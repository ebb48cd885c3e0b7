//! Config resolver.
//!
//! `resolve(community_id)` loads the community's active design and its four
//! child collections and assembles one immutable [`GameConfig`]. Results are
//! cached per community with a TTL; activation invalidates the entry so
//! readers never observe a stale ruleset for long, and never a torn one —
//! a snapshot is either the old config or the new, never a mix.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use rulebook::GameConfig;

use crate::clock::Clock;
use crate::config::ResolverPolicy;
use crate::store::DesignStore;
use crate::types::{GovernanceError, Result};

struct CacheEntry {
    config: Arc<GameConfig>,
    fetched_at: DateTime<Utc>,
}

/// Resolves and caches the active ruleset per community.
pub struct ConfigResolver {
    designs: Arc<dyn DesignStore>,
    clock: Arc<dyn Clock>,
    cache: DashMap<Uuid, CacheEntry>,
    ttl: Duration,
}

impl ConfigResolver {
    /// Create a resolver over a design store.
    pub fn new(designs: Arc<dyn DesignStore>, clock: Arc<dyn Clock>, policy: &ResolverPolicy) -> Self {
        Self {
            designs,
            clock,
            cache: DashMap::new(),
            ttl: Duration::seconds(policy.cache_ttl_secs as i64),
        }
    }

    /// Resolve the active game configuration for a community.
    ///
    /// Fails with [`GovernanceError::NoActiveConfig`] if the community has
    /// never activated a design; callers fall back to
    /// [`GameConfig::classic`] or use [`Self::resolve_or_classic`].
    pub async fn resolve(&self, community_id: Uuid) -> Result<Arc<GameConfig>> {
        let now = self.clock.now();

        if let Some(entry) = self.cache.get(&community_id) {
            if now - entry.fetched_at < self.ttl {
                return Ok(entry.config.clone());
            }
        }

        let design = self
            .designs
            .active_design(community_id)
            .await?
            .ok_or(GovernanceError::NoActiveConfig)?;
        let children = self.designs.children(design.id).await?;
        let config = Arc::new(GameConfig::from_parts(&design, children));

        debug!(
            community_id = %community_id,
            design_id = %design.id,
            version = design.version,
            hash = %config.content_hash(),
            "Resolved active game config"
        );

        self.cache.insert(
            community_id,
            CacheEntry {
                config: config.clone(),
                fetched_at: now,
            },
        );
        Ok(config)
    }

    /// Resolve, falling back to the Classic ruleset for communities that
    /// have never initialized one. Store failures still surface.
    pub async fn resolve_or_classic(&self, community_id: Uuid) -> Result<Arc<GameConfig>> {
        match self.resolve(community_id).await {
            Ok(config) => Ok(config),
            Err(GovernanceError::NoActiveConfig) => Ok(Arc::new(GameConfig::classic())),
            Err(e) => Err(e),
        }
    }

    /// Drop the cached config for a community. Called after activation.
    pub fn invalidate(&self, community_id: Uuid) {
        if self.cache.remove(&community_id).is_some() {
            debug!(community_id = %community_id, "Invalidated cached game config");
        }
    }

    /// Drop every cached config.
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }
}
