//! Application state shared across all request handlers.

use std::sync::Arc;

use snipbin_core::SnippetStore;

use crate::config::Config;
use crate::templates::TemplateCache;

/// Shared application state available to all request handlers.
///
/// Everything here is either immutable after start-up (config, template
/// cache) or internally synchronized (the store), so per-request tasks can
/// clone freely without additional locking.
#[derive(Clone)]
pub struct AppState {
    /// Snippet persistence, injected once at construction time.
    pub store: Arc<dyn SnippetStore>,

    /// Pre-parsed template sets, built before the listener starts.
    pub templates: Arc<TemplateCache>,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: Config, store: Arc<dyn SnippetStore>, templates: TemplateCache) -> Self {
        Self {
            store,
            templates: Arc::new(templates),
            config: Arc::new(config),
        }
    }
}
