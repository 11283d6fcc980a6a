//! Generation Cache
//!
//! Content-addressed memoization of generator calls, durable across process
//! runs. SQLite (WAL mode, pooled connections) is the store; a `DashMap` hot
//! layer serves repeated keys within one run without touching disk.
//!
//! The key covers every input that affects output: scheme version, language,
//! definition kind, temperature, and the verbatim definition text. Entries
//! never expire on their own; clearing the store is an operator action.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, params};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::{DocstringGenerator, GenerateRequest};
use crate::constants::cache::SCHEME_VERSION;
use crate::schema::DocstringData;
use crate::types::{DocsmithError, GenerateError, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS docstrings (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Derive the deterministic cache key for a request.
///
/// Temperature goes in via its bit pattern so two floats hash identically
/// exactly when they compare identically.
pub fn cache_key(request: &GenerateRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(SCHEME_VERSION.to_le_bytes());
    hasher.update(request.language.as_str().as_bytes());
    hasher.update([0]);
    hasher.update(request.kind.as_str().as_bytes());
    hasher.update([0]);
    hasher.update(request.temperature.to_bits().to_le_bytes());
    hasher.update([0]);
    hasher.update(request.definition.as_bytes());
    format!("v{}:{:x}", SCHEME_VERSION, hasher.finalize())
}

/// Durable key-value store for generated docstrings
pub struct GenerationCache {
    pool: Pool<SqliteConnectionManager>,
    hot: DashMap<String, DocstringData>,
}

impl GenerationCache {
    /// Open (or create) the cache store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let manager =
            SqliteConnectionManager::file(path.as_ref()).with_init(Self::configure_connection);
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .map_err(|e| DocsmithError::Cache(format!("Failed to open cache store: {}", e)))?;

        let cache = Self {
            pool,
            hot: DashMap::new(),
        };
        cache.initialize()?;
        Ok(cache)
    }

    /// In-memory store for tests; a single pooled connection keeps all
    /// readers and writers on the same database
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(Self::configure_connection);
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| DocsmithError::Cache(format!("Failed to open cache store: {}", e)))?;

        let cache = Self {
            pool,
            hot: DashMap::new(),
        };
        cache.initialize()?;
        Ok(cache)
    }

    fn configure_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    fn initialize(&self) -> Result<()> {
        self.conn()?.execute(SCHEMA, [])?;
        Ok(())
    }

    /// Look up a key, consulting the hot layer before the store
    pub fn get(&self, key: &str) -> Result<Option<DocstringData>> {
        if let Some(hit) = self.hot.get(key) {
            return Ok(Some(hit.clone()));
        }

        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT value FROM docstrings WHERE key = ?1")?;
        let row: Option<String> = stmt
            .query_row(params![key], |row| row.get(0))
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        match row {
            Some(json) => {
                let data: DocstringData = serde_json::from_str(&json)?;
                self.hot.insert(key.to_string(), data.clone());
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Persist a value under a key; last writer wins for concurrent inserts
    /// of the same key, which is harmless because identical keys carry
    /// identical values
    pub fn put(&self, key: &str, data: &DocstringData) -> Result<()> {
        let json = serde_json::to_string(data)?;
        self.conn()?.execute(
            "INSERT OR REPLACE INTO docstrings (key, value) VALUES (?1, ?2)",
            params![key, json],
        )?;
        self.hot.insert(key.to_string(), data.clone());
        Ok(())
    }

    /// Number of persisted entries (all scheme versions)
    pub fn len(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM docstrings", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Operator invalidation: drop every entry
    pub fn clear(&self) -> Result<usize> {
        let removed = self.conn()?.execute("DELETE FROM docstrings", [])?;
        self.hot.clear();
        info!(removed, "Cleared generation cache");
        Ok(removed)
    }
}

// =============================================================================
// Caching Wrapper
// =============================================================================

/// Transparent memoizing wrapper around any [`DocstringGenerator`].
///
/// The caching is an explicit collaborator at the call site rather than an
/// implicit function annotation: `get_or_generate` consults the store, and
/// only a miss reaches the wrapped generator. Failures are never cached.
pub struct CachedGenerator {
    cache: Arc<GenerationCache>,
    inner: Arc<dyn DocstringGenerator>,
}

impl CachedGenerator {
    pub fn new(cache: Arc<GenerationCache>, inner: Arc<dyn DocstringGenerator>) -> Self {
        Self { cache, inner }
    }

    async fn get_or_generate(
        &self,
        request: &GenerateRequest,
    ) -> std::result::Result<DocstringData, GenerateError> {
        let key = cache_key(request);

        match self.cache.get(&key) {
            Ok(Some(hit)) => {
                debug!(key = %key, "Generation cache hit");
                return Ok(hit);
            }
            Ok(None) => {}
            // A broken store must not take generation down with it
            Err(e) => debug!(key = %key, error = %e, "Cache read failed, regenerating"),
        }

        let data = self.inner.generate(request).await?;

        if let Err(e) = self.cache.put(&key, &data) {
            debug!(key = %key, error = %e, "Cache write failed");
        }

        Ok(data)
    }
}

#[async_trait::async_trait]
impl DocstringGenerator for CachedGenerator {
    async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> std::result::Result<DocstringData, GenerateError> {
        self.get_or_generate(request).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
