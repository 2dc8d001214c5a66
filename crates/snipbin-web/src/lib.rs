//! Snipbin — a multi-page web application for expiring text snippets.
//!
//! Users post short text snippets that live for a fixed number of days and
//! disappear afterwards. The interesting machinery is the request pipeline:
//!
//! - **Middleware chain**: panic recovery, request logging, security headers,
//!   plus route-scoped authentication and CSRF wrappers ([`middleware`])
//! - **Router**: method + path dispatch with parameterized segments and a
//!   static-file fallback under `/static` ([`routes`])
//! - **Template cache**: every page template composed with the shared layout
//!   and partials at start-up, rendered fully in memory before any response
//!   byte is written ([`templates`])
//! - **Form validation**: constraint checks over submitted fields feeding
//!   error state back into re-rendered pages ([`forms`])
//!
//! Persistence sits behind the `SnippetStore` capability from `snipbin-core`;
//! session state sits behind `tower-sessions`. Handlers share nothing else.

pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod templates;

pub use config::Config;
pub use error::AppError;
pub use routes::router;
pub use state::AppState;
pub use store::{MemorySnippetStore, SqliteSnippetStore};
pub use templates::{PageData, TemplateCache};
