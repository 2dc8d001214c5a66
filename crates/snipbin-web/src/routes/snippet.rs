//! Snippet viewing and creation.

use axum::extract::{Path, RawForm, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use snipbin_core::{EXPIRES_CHOICES, MAX_TITLE_CHARS};
use tower_sessions::Session;

use super::{page_data, render};
use crate::error::AppError;
use crate::forms::{FormData, FormState, Validator};
use crate::session::put_flash;
use crate::state::AppState;

/// `GET /snippet/{id}` — show one live snippet.
///
/// A non-numeric, non-positive, unknown, or expired id all produce the same
/// 404; the store's "absent or expired" answer maps straight onto it.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id: i64 = id.parse().map_err(|_| AppError::NotFound)?;
    if id < 1 {
        return Err(AppError::NotFound);
    }

    let snippet = state.store.get(id).await?;

    let mut data = page_data(&session).await?;
    data.snippet = Some(snippet);
    render(&state, "show.page.html", &data)
}

/// `GET /snippet/create` — empty creation form, defaulting to a one-year
/// expiry.
pub async fn create_form(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let mut data = page_data(&session).await?;
    data.form = Some(FormState::with_values(&[("expires", "365")]));
    render(&state, "create.page.html", &data)
}

/// `POST /snippet/create` — validate, insert, redirect to the new snippet.
///
/// Validation failure is not an error: the form is re-rendered (200) with
/// the submitted values and field messages. Only an unparseable body is a
/// client error.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RawForm(body): RawForm,
) -> Result<Response, AppError> {
    let form =
        FormData::from_bytes(&body).map_err(|_| AppError::Client(StatusCode::BAD_REQUEST))?;

    let mut validator = Validator::new(form);
    validator.require_non_blank(&["title", "content", "expires"]);
    validator.max_length("title", MAX_TITLE_CHARS);
    validator.permitted_values("expires", EXPIRES_CHOICES);

    if !validator.valid() {
        let mut data = page_data(&session).await?;
        data.form = Some(validator.into_state());
        return render(&state, "create.page.html", &data);
    }

    let expires_days: i64 = validator
        .form()
        .get("expires")
        .parse()
        .map_err(|_| AppError::Client(StatusCode::BAD_REQUEST))?;

    let id = state
        .store
        .insert(
            validator.form().get("title"),
            validator.form().get("content"),
            expires_days,
        )
        .await?;

    put_flash(&session, "Snippet successfully created!").await?;
    Ok(Redirect::to(&format!("/snippet/{id}")).into_response())
}
