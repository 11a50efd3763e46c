//! Memoized schema compilation using moka
//!
//! Compiled schemas are immutable, so identical definitions compile once and
//! are shared through `Arc` across blocks, commands and tasks.

use crate::compiler::{try_compile, CompiledSchema};
use crate::error::CompileError;
use crate::hash::SchemaHash;
use moka::future::Cache;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Approximate number of memoized schemas
    pub entry_count: u64,
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that compiled
    pub misses: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Cache of compiled schemas keyed by definition hash
///
/// Failed compilations are not cached.
#[derive(Debug, Clone)]
pub struct SchemaCache {
    inner: Cache<SchemaHash, Arc<CompiledSchema>>,
    counters: Arc<Counters>,
}

impl SchemaCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
            counters: Arc::default(),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            counters: Arc::default(),
        }
    }

    /// Compile a definition, reusing a memoized result when present
    ///
    /// # Errors
    /// Propagates [`CompileError`] from the compiler; failures are not cached.
    pub async fn compile(&self, definition: &Value) -> Result<Arc<CompiledSchema>, CompileError> {
        let hash = SchemaHash::of(definition);

        if let Some(cached) = self.inner.get(&hash).await {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached);
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        let compiled = Arc::new(try_compile(definition)?);
        tracing::debug!(schema = %hash.short(), "compiled props schema");

        self.inner.insert(hash, Arc::clone(&compiled)).await;
        Ok(compiled)
    }

    /// Check if a definition is memoized
    #[inline]
    pub async fn contains(&self, definition: &Value) -> bool {
        self.inner.get(&SchemaHash::of(definition)).await.is_some()
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for SchemaCache {
    /// Create cache with default capacity (1,024 entries)
    fn default() -> Self {
        Self::new(1_024)
    }
}
