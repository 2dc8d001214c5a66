//! The snippet store capability.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Snippet;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors a store implementation can signal.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No live snippet matched the query. Absent and expired rows are
    /// deliberately indistinguishable.
    #[error("no matching snippet")]
    NotFound,

    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence capability for snippets.
///
/// Handlers hold this as `Arc<dyn SnippetStore>`; the concrete backend is
/// chosen once at start-up and never swapped at runtime. Implementations must
/// be safe for concurrent use — callers add no locking of their own.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Insert a new snippet expiring `expires_days` days from now and return
    /// its assigned id.
    async fn insert(&self, title: &str, content: &str, expires_days: i64) -> StoreResult<i64>;

    /// Fetch a single live snippet by id.
    ///
    /// Returns [`StoreError::NotFound`] for ids that are absent or expired.
    async fn get(&self, id: i64) -> StoreResult<Snippet>;

    /// The most recently created live snippets, newest first, at most `limit`.
    async fn latest(&self, limit: i64) -> StoreResult<Vec<Snippet>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        assert_eq!(StoreError::NotFound.to_string(), "no matching snippet");
    }

    #[test]
    fn database_display_carries_cause() {
        let err = StoreError::Database(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("database error:"));
    }
}
