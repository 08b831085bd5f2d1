//! Per-entity cache of derived schemas.
//!
//! Entries never expire on their own; callers invalidate them when an
//! entity's attributes change. A schema is fully built before it is
//! published, so readers see either the previous schema or the new one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::deriver::DerivedSchema;
use crate::error::Result;

/// Cache statistics.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl CacheStats {
    /// Get hit count.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get miss count.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get invalidation count.
    pub fn invalidations(&self) -> u64 {
        self.invalidations.load(Ordering::Relaxed)
    }

    /// Calculate hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

/// Derived schemas keyed by entity name.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: DashMap<String, Arc<DerivedSchema>>,
    stats: CacheStats,
}

impl SchemaCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached schema for an entity.
    pub fn get(&self, entity: &str) -> Option<Arc<DerivedSchema>> {
        self.schemas.get(entity).map(|entry| Arc::clone(entry.value()))
    }

    /// Get the cached schema, deriving and publishing it on a miss.
    ///
    /// Derivation runs without holding any cache lock. If two callers miss
    /// at once, both derive and the last one to finish is kept.
    pub fn get_or_insert_with<F>(&self, entity: &str, derive: F) -> Result<Arc<DerivedSchema>>
    where
        F: FnOnce() -> Result<DerivedSchema>,
    {
        if let Some(schema) = self.get(entity) {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(entity, "schema cache hit");
            return Ok(schema);
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(entity, "schema cache miss");

        let schema = Arc::new(derive()?);
        self.schemas.insert(entity.to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Drop the cached schema of an entity. Returns whether one was cached.
    pub fn invalidate(&self, entity: &str) -> bool {
        let removed = self.schemas.remove(entity).is_some();
        if removed {
            self.stats.invalidations.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    /// Drop every cached schema.
    pub fn clear(&self) {
        let count = self.schemas.len() as u64;
        self.schemas.clear();
        self.stats.invalidations.fetch_add(count, Ordering::Relaxed);
    }

    /// Get cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
