//! Shared application state for the CLI and the HTTP API.
//!
//! `CoreState` owns the current snapshot of the store and the view cache.
//! The snapshot sits behind an `RwLock<Option<Arc<..>>>` so readers clone
//! the `Arc` and drop the lock before computing anything; a reload swaps
//! in a new `Arc` with a higher version and evicts cached results built
//! from older versions. Loads are serialised, and a generation whose
//! version is not above the installed one is refused.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db;
use crate::engine::{self, ViewRequest, ViewResult};
use crate::models::Snapshot;
use crate::view_cache::ViewCache;

/// Maximum number of audit entries kept in memory.
const AUDIT_BUFFER_CAPACITY: usize = 100;

// ═══════════════════════════════════════════════════════════
// LoadedStore: one immutable generation of the data
// ═══════════════════════════════════════════════════════════

/// A snapshot plus the store version it was loaded as.
#[derive(Debug)]
pub struct LoadedStore {
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    pub snapshot: Snapshot,
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

/// Application state, wrapped in `Arc` at startup and shared by every
/// request handler.
pub struct CoreState {
    db_path: PathBuf,
    /// Current generation. `None` until first access or reload.
    store: RwLock<Option<Arc<LoadedStore>>>,
    cache: Mutex<ViewCache>,
    /// Held for the whole read-and-install of a generation.
    load_lock: Mutex<()>,
    /// Last version handed out; versions start at 1.
    version: AtomicU64,
    audit: AuditLogger,
}

impl CoreState {
    /// State backed by the SQLite file at `db_path`. Nothing is read yet.
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            store: RwLock::new(None),
            cache: Mutex::new(ViewCache::new()),
            load_lock: Mutex::new(()),
            version: AtomicU64::new(0),
            audit: AuditLogger::new(),
        }
    }

    /// State preloaded with `snapshot` as version 1.
    pub fn with_snapshot(db_path: PathBuf, snapshot: Snapshot) -> Self {
        let state = Self::new(db_path);
        let loaded = state.next_generation(snapshot);
        if let Ok(mut guard) = state.store.write() {
            *guard = Some(loaded);
        }
        state
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection to the backing store (migrations applied).
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    // ── Snapshot access ─────────────────────────────────────

    /// Current generation, loading it from the store on first use.
    pub fn snapshot(&self) -> Result<Arc<LoadedStore>, CoreError> {
        if let Some(store) = self.installed()? {
            return Ok(store);
        }

        let _serial = self.load_lock.lock().map_err(|_| CoreError::LockPoisoned)?;
        // Another caller may have loaded while we waited.
        if let Some(store) = self.installed()? {
            return Ok(store);
        }
        let loaded = self.load_generation()?;
        self.install(Arc::clone(&loaded))?;
        Ok(loaded)
    }

    fn installed(&self) -> Result<Option<Arc<LoadedStore>>, CoreError> {
        let guard = self.store.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(guard.as_ref().map(Arc::clone))
    }

    /// Version of the current generation, or 0 when nothing is loaded.
    pub fn current_version(&self) -> u64 {
        self.store
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|s| s.version))
            .unwrap_or(0)
    }

    /// Re-read the store and swap in a new generation.
    ///
    /// On failure the previous generation stays in place.
    pub fn reload(&self) -> Result<Arc<LoadedStore>, CoreError> {
        let _serial = self.load_lock.lock().map_err(|_| CoreError::LockPoisoned)?;
        let loaded = self.load_generation()?;
        self.install(Arc::clone(&loaded))?;
        self.cache
            .lock()
            .map_err(|_| CoreError::LockPoisoned)?
            .retain_version(loaded.version);

        tracing::info!(version = loaded.version, "Store reloaded");
        Ok(loaded)
    }

    /// Make `loaded` the current generation. Refused unless its version is
    /// above the installed one.
    fn install(&self, loaded: Arc<LoadedStore>) -> Result<(), CoreError> {
        let mut guard = self.store.write().map_err(|_| CoreError::LockPoisoned)?;
        let current = guard.as_ref().map_or(0, |s| s.version);
        if loaded.version <= current {
            tracing::warn!(offered = loaded.version, current, "Refused stale store generation");
            return Err(CoreError::StaleGeneration {
                offered: loaded.version,
                current,
            });
        }
        *guard = Some(loaded);
        Ok(())
    }

    fn load_generation(&self) -> Result<Arc<LoadedStore>, CoreError> {
        let conn = self.open_db()?;
        let snapshot = db::load_snapshot(&conn)?;
        Ok(self.next_generation(snapshot))
    }

    fn next_generation(&self, snapshot: Snapshot) -> Arc<LoadedStore> {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        Arc::new(LoadedStore {
            version,
            loaded_at: Utc::now(),
            snapshot,
        })
    }

    // ── Views ───────────────────────────────────────────────

    /// Evaluate a view against the current generation, memoised.
    pub fn view(&self, request: &ViewRequest) -> Result<Arc<ViewResult>, CoreError> {
        self.view_versioned(request).map(|(_, result)| result)
    }

    /// Like [`CoreState::view`], also returning the generation it came from.
    pub fn view_versioned(
        &self,
        request: &ViewRequest,
    ) -> Result<(u64, Arc<ViewResult>), CoreError> {
        let store = self.snapshot()?;
        let result = self.memoise(&store, request)?;
        Ok((store.version, result))
    }

    /// Evaluate against `store`, caching only while it is still current.
    ///
    /// The cache lock is taken before the version check, so a reload that
    /// lands afterwards evicts the entry in its own `retain_version`.
    fn memoise(
        &self,
        store: &LoadedStore,
        request: &ViewRequest,
    ) -> Result<Arc<ViewResult>, CoreError> {
        let mut cache = self.cache.lock().map_err(|_| CoreError::LockPoisoned)?;
        if store.version != self.current_version() {
            return Ok(cache
                .get(request, store.version)
                .unwrap_or_else(|| Arc::new(engine::evaluate(&store.snapshot, request))));
        }
        Ok(cache.get_or_compute(request, store.version, &store.snapshot))
    }

    /// Number of memoised view results.
    pub fn cached_views(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    // ── Audit ───────────────────────────────────────────────

    /// Record a data access event.
    pub fn log_access(&self, source: AccessSource, action: &str, entity: &str) {
        self.audit.log(source, action, entity);
    }

    /// Buffered audit entries, oldest first.
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit.entries()
    }
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("Store generation {offered} is not newer than {current}")]
    StaleGeneration { offered: u64, current: u64 },
}

// ═══════════════════════════════════════════════════════════
// Access source
// ═══════════════════════════════════════════════════════════

/// Who read the data. Serialised as its display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessSource {
    /// Command-line invocation.
    Cli,
    /// HTTP request; `peer` is the client address when known.
    Api { peer: Option<String> },
}

impl std::fmt::Display for AccessSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::Api { peer: Some(peer) } => write!(f, "api:{peer}"),
            Self::Api { peer: None } => write!(f, "api"),
        }
    }
}

impl Serialize for AccessSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ═══════════════════════════════════════════════════════════
// Audit logger
// ═══════════════════════════════════════════════════════════

/// In-memory access log. Keeps the most recent entries only.
pub struct AuditLogger {
    buffer: Mutex<Vec<AuditEntry>>,
}

/// A single audit log entry.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub source: AccessSource,
    pub action: String,
    pub entity: String,
}

impl AuditLogger {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(Vec::with_capacity(AUDIT_BUFFER_CAPACITY)),
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn log(&self, source: AccessSource, action: &str, entity: &str) {
        if let Ok(mut buf) = self.buffer.lock() {
            if buf.len() >= AUDIT_BUFFER_CAPACITY {
                buf.remove(0);
            }
            buf.push(AuditEntry {
                timestamp: Utc::now(),
                source,
                action: action.to_string(),
                entity: entity.to_string(),
            });
        }
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.buffer
            .lock()
            .map(|buf| buf.clone())
            .unwrap_or_default()
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
