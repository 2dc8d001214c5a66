//! Pre-parsed template sets and the per-request page data they render.
//!
//! The cache is built once before the listener starts and is immutable
//! afterwards, so every request avoids disk I/O and no read/write race is
//! possible. Each `*.page.html` file is composed with every layout and
//! partial in the same directory into its own [`tera::Tera`] set, keyed by
//! the page's file name.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use snipbin_core::Snippet;
use tera::Tera;

use crate::error::AppError;
use crate::forms::FormState;

/// Name-keyed mapping of pre-compiled template sets.
pub struct TemplateCache {
    sets: HashMap<String, Tera>,
}

impl TemplateCache {
    /// Parse and compose every page template under `dir`.
    ///
    /// Fails on the first file that cannot be read or parsed — there is no
    /// partial or degraded cache; start-up aborts instead.
    pub fn build(dir: &Path) -> anyhow::Result<Self> {
        let mut pages = Vec::new();
        let mut shared = Vec::new();

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("reading template directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.ends_with(".page.html") {
                pages.push((path.clone(), name.to_string()));
            } else if name.ends_with(".layout.html") || name.ends_with(".partial.html") {
                shared.push((path.clone(), name.to_string()));
            }
        }

        let mut sets = HashMap::new();
        for (path, name) in &pages {
            let mut tera = Tera::default();
            tera.register_filter("human_date", human_date);

            let mut files: Vec<(&Path, Option<&str>)> = shared
                .iter()
                .map(|(p, n)| (p.as_path(), Some(n.as_str())))
                .collect();
            files.push((path.as_path(), Some(name.as_str())));
            tera.add_template_files(files)
                .with_context(|| format!("parsing template set for {name}"))?;

            sets.insert(name.clone(), tera);
        }

        tracing::info!(pages = sets.len(), dir = %dir.display(), "template cache built");
        Ok(Self { sets })
    }

    /// Render the named page with `data`.
    ///
    /// The whole body is produced in memory before any response byte is
    /// written, so a mid-render failure yields a clean 500 instead of a
    /// truncated 200. An unknown `name` is an internal consistency error (a
    /// handler referenced a page the builder never produced), not a 404.
    pub fn render(&self, name: &str, data: &PageData) -> Result<String, AppError> {
        let set = self
            .sets
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("the template {name} does not exist"))?;
        let context = tera::Context::from_serialize(data)?;
        Ok(set.render(name, &context)?)
    }

    /// Names of all cached page sets, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Per-request assembly struct handed to the template engine.
///
/// Created fresh for every request and discarded once the response is
/// rendered; never persisted or shared across requests.
#[derive(Debug, Serialize)]
pub struct PageData {
    /// Year of the generation timestamp, for the footer.
    pub current_year: i32,
    /// One-shot message taken from the session, if any.
    pub flash: Option<String>,
    /// Whether an authenticated-user id is present in the session.
    pub authenticated: bool,
    /// Session CSRF token, embedded in every form.
    pub csrf_token: String,
    /// Single snippet for the show page.
    pub snippet: Option<Snippet>,
    /// Snippet listing for the home page.
    pub snippets: Vec<Snippet>,
    /// Echoed form values and errors for re-rendered forms.
    pub form: Option<FormState>,
}

impl PageData {
    /// Assemble the request-independent defaults.
    pub fn new(flash: Option<String>, authenticated: bool, csrf_token: String) -> Self {
        Self {
            current_year: Utc::now().year(),
            flash,
            authenticated,
            csrf_token,
            snippet: None,
            snippets: Vec::new(),
            form: None,
        }
    }
}

/// Tera filter rendering a serialized UTC timestamp as "02 Jan 2026 at 15:04".
fn human_date(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("human_date expects a datetime string"))?;
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| tera::Error::msg(format!("human_date: invalid datetime {raw:?}: {e}")))?;
    let formatted = parsed
        .with_timezone(&Utc)
        .format("%d %b %Y at %H:%M")
        .to_string();
    Ok(tera::Value::String(formatted))
}
