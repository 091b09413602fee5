//! Memoised view results.
//!
//! Entries are keyed by the request and the store version they were
//! computed from. A reload bumps the version, so stale entries can never be
//! returned; `retain_version` drops them eagerly. The cache holds at most
//! `capacity` entries and evicts the oldest insertion first.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::engine::{self, ViewRequest, ViewResult};
use crate::models::Snapshot;

/// Default number of results kept across all requests.
pub const DEFAULT_VIEW_CACHE_CAPACITY: usize = 256;

// ═══════════════════════════════════════════════════════════
// CacheKey
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    request: ViewRequest,
    version: u64,
}

// ═══════════════════════════════════════════════════════════
// ViewCache
// ═══════════════════════════════════════════════════════════

/// View results keyed by (request, store version).
pub struct ViewCache {
    entries: HashMap<CacheKey, Arc<ViewResult>>,
    /// Keys in insertion order, oldest at the front.
    order: VecDeque<CacheKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl ViewCache {
    /// Create an empty cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_VIEW_CACHE_CAPACITY)
    }

    /// Create an empty cache holding at most `capacity` results (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Cached result for `request` at `version`, if any.
    pub fn get(&self, request: &ViewRequest, version: u64) -> Option<Arc<ViewResult>> {
        self.entries
            .get(&CacheKey {
                request: request.clone(),
                version,
            })
            .cloned()
    }

    /// Return the cached result or evaluate the view against `snapshot` and
    /// remember it.
    pub fn get_or_compute(
        &mut self,
        request: &ViewRequest,
        version: u64,
        snapshot: &Snapshot,
    ) -> Arc<ViewResult> {
        let key = CacheKey {
            request: request.clone(),
            version,
        };
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            return Arc::clone(hit);
        }

        self.misses += 1;
        let result = Arc::new(engine::evaluate(snapshot, request));
        self.insert(key, Arc::clone(&result));
        result
    }

    fn insert(&mut self, key: CacheKey, result: Arc<ViewResult>) {
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, result);
    }

    /// Drop every entry computed from a version other than `version`.
    pub fn retain_version(&mut self, version: u64) {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.version == version);
        self.order.retain(|key| key.version == version);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, version, "Evicted stale view results");
        }
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached results.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
