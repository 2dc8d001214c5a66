//! Core domain types and store capabilities for the snipbin web application.
//!
//! This crate provides:
//! - The [`Snippet`] domain type shared by every layer of the application
//! - The [`SnippetStore`] capability trait that the web layer is written
//!   against, so a concrete backend is injected once at construction time
//! - Shared error types for store implementations
//!
//! No HTTP or template knowledge lives here.

mod model;
mod store;

// ═══════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════

/// Maximum snippet title length, counted in characters (not bytes).
pub const MAX_TITLE_CHARS: usize = 100;

/// Permitted values for the creation form's expiry field, in days.
pub const EXPIRES_CHOICES: &[&str] = &["1", "7", "365"];

/// How many snippets the home page lists.
pub const LATEST_LIMIT: i64 = 10;

pub use model::Snippet;
pub use store::{SnippetStore, StoreError, StoreResult};
