//! Concrete `SnippetStore` implementations.
//!
//! The SQLite store is the durable backend; the in-memory store backs tests
//! and database-free local runs. Both enforce the same visibility rule:
//! expired snippets are excluded from every query, never deleted.

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use parking_lot::Mutex;
use snipbin_core::{Snippet, SnippetStore, StoreError, StoreResult};
use sqlx::sqlite::SqlitePool;

/// Schema applied at connect time.
const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS snippets (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    title   TEXT NOT NULL,
    content TEXT NOT NULL,
    created TEXT NOT NULL,
    expires TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_snippets_created ON snippets (created);
CREATE INDEX IF NOT EXISTS idx_snippets_expires ON snippets (expires);
";

/// SQLite-backed snippet store.
///
/// The pool provides the concurrency safety the trait demands; handlers add
/// no locking of their own.
pub struct SqliteSnippetStore {
    pool: SqlitePool,
}

impl SqliteSnippetStore {
    /// Open the pool and apply the schema.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = SqlitePool::connect(database_url).await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl SnippetStore for SqliteSnippetStore {
    async fn insert(&self, title: &str, content: &str, expires_days: i64) -> StoreResult<i64> {
        let created = Utc::now();
        let expires = created + TimeDelta::days(expires_days);
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO snippets (title, content, created, expires)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id",
        )
        .bind(title)
        .bind(content)
        .bind(created)
        .bind(expires)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get(&self, id: i64) -> StoreResult<Snippet> {
        sqlx::query_as::<_, Snippet>(
            "SELECT id, title, content, created, expires
             FROM snippets
             WHERE id = ?1 AND expires > ?2",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn latest(&self, limit: i64) -> StoreResult<Vec<Snippet>> {
        let snippets = sqlx::query_as::<_, Snippet>(
            "SELECT id, title, content, created, expires
             FROM snippets
             WHERE expires > ?1
             ORDER BY created DESC, id DESC
             LIMIT ?2",
        )
        .bind(Utc::now())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(snippets)
    }
}

/// In-memory snippet store for tests and database-free local runs.
#[derive(Default)]
pub struct MemorySnippetStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: i64,
    snippets: Vec<Snippet>,
}

impl MemorySnippetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnippetStore for MemorySnippetStore {
    async fn insert(&self, title: &str, content: &str, expires_days: i64) -> StoreResult<i64> {
        let created = Utc::now();
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.snippets.push(Snippet {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created,
            expires: created + TimeDelta::days(expires_days),
        });
        Ok(id)
    }

    async fn get(&self, id: i64) -> StoreResult<Snippet> {
        let now = Utc::now();
        self.inner
            .lock()
            .snippets
            .iter()
            .find(|s| s.id == id && s.is_live(now))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn latest(&self, limit: i64) -> StoreResult<Vec<Snippet>> {
        let now = Utc::now();
        let mut live: Vec<Snippet> = self
            .inner
            .lock()
            .snippets
            .iter()
            .filter(|s| s.is_live(now))
            .cloned()
            .collect();
        live.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        live.truncate(limit.max(0) as usize);
        Ok(live)
    }
}
