//! The snippet domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored, time-bounded text item.
///
/// Snippets are never mutated after insertion. Deletion is purely time-based:
/// once `expires` has passed, stores exclude the row from every query, so an
/// expired snippet is indistinguishable from one that never existed.
///
/// Invariant: `expires > created`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Snippet {
    /// Positive, unique, assigned by the store.
    pub id: i64,
    /// Title, bounded at the validation layer (not here).
    pub title: String,
    /// Unbounded body text.
    pub content: String,
    /// Insertion time (UTC).
    pub created: DateTime<Utc>,
    /// The instant the snippet stops being served.
    pub expires: DateTime<Utc>,
}

impl Snippet {
    /// Whether this snippet is still being served at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn snippet(created: DateTime<Utc>, expires: DateTime<Utc>) -> Snippet {
        Snippet {
            id: 1,
            title: "O snail".to_string(),
            content: "Climb Mount Fuji".to_string(),
            created,
            expires,
        }
    }

    #[test]
    fn live_before_expiry() {
        let now = Utc::now();
        let s = snippet(now - TimeDelta::days(1), now + TimeDelta::days(6));
        assert!(s.is_live(now));
    }

    #[test]
    fn dead_at_exact_expiry() {
        let now = Utc::now();
        let s = snippet(now - TimeDelta::days(7), now);
        assert!(!s.is_live(now));
    }

    #[test]
    fn dead_after_expiry() {
        let now = Utc::now();
        let s = snippet(now - TimeDelta::days(8), now - TimeDelta::days(1));
        assert!(!s.is_live(now));
    }
}
