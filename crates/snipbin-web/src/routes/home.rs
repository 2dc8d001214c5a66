//! Home page — the most recent live snippets.

use axum::extract::State;
use axum::response::Response;
use snipbin_core::LATEST_LIMIT;
use tower_sessions::Session;

use super::{page_data, render};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /` — list the latest live snippets.
///
/// An empty listing is a valid, renderable state, not an error.
pub async fn home(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let snippets = state.store.latest(LATEST_LIMIT).await?;
    let mut data = page_data(&session).await?;
    data.snippets = snippets;
    render(&state, "home.page.html", &data)
}
