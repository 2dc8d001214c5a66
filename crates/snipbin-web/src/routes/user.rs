//! Login and logout.
//!
//! Authentication here is exactly "a user id is present in the session" —
//! there are no credentials, accounts, or permission levels anywhere in the
//! application.

use axum::extract::{RawForm, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use super::{page_data, render};
use crate::error::AppError;
use crate::forms::{FormData, FormState, Validator};
use crate::session::{SESSION_USER_ID_KEY, put_flash};
use crate::state::AppState;

/// `GET /user/login` — render the login form.
pub async fn login_form(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let mut data = page_data(&session).await?;
    data.form = Some(FormState::default());
    render(&state, "login.page.html", &data)
}

/// `POST /user/login` — mark the session authenticated.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    RawForm(body): RawForm,
) -> Result<Response, AppError> {
    let form =
        FormData::from_bytes(&body).map_err(|_| AppError::Client(StatusCode::BAD_REQUEST))?;

    let mut validator = Validator::new(form);
    validator.require_non_blank(&["name"]);

    if !validator.valid() {
        let mut data = page_data(&session).await?;
        data.form = Some(validator.into_state());
        return render(&state, "login.page.html", &data);
    }

    // New privilege level, new session id.
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, 1_i64).await?;
    put_flash(&session, "You've been logged in successfully!").await?;
    Ok(Redirect::to("/snippet/create").into_response())
}

/// `POST /user/logout` — drop the authenticated-user id.
pub async fn logout(session: Session) -> Result<Response, AppError> {
    let _ = session.remove::<i64>(SESSION_USER_ID_KEY).await?;
    put_flash(&session, "You've been logged out successfully!").await?;
    Ok(Redirect::to("/").into_response())
}
