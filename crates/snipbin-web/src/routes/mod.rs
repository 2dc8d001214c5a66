//! Route definitions and shared handler helpers.
//!
//! ## Routes
//!
//! ### Public
//! - `GET /` - Latest live snippets
//! - `GET /snippet/{id}` - Show one snippet
//! - `GET /user/login` - Login form
//! - `POST /user/login` - Log in (CSRF-checked)
//! - `GET /static/{*path}` - Static files, prefix stripped before lookup
//!
//! ### Protected (redirect to `/user/login` without a session user id)
//! - `GET /snippet/create` - Creation form
//! - `POST /snippet/create` - Create a snippet (CSRF-checked)
//! - `POST /user/logout` - Log out (CSRF-checked)
//!
//! Anything else is a plain-text 404; a known path under the wrong method is
//! a 405 with an `Allow` header.

mod home;
mod snippet;
mod user;

use axum::Router;
use axum::middleware::from_fn;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use crate::error::AppError;
use crate::middleware::{csrf_protect, handle_panic, log_request, require_auth, secure_headers};
use crate::session;
use crate::state::AppState;
use crate::templates::PageData;

/// Build the complete application router, middleware included.
///
/// Constructed once at start-up and handed to the listener; nothing here is
/// process-global. Layer declaration order puts panic recovery outermost,
/// then request logging, then security headers, then the session layer, with
/// the auth/CSRF wrappers scoped to the routes that declare them.
pub fn router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name("snipbin_id")
        .with_path("/")
        .with_same_site(SameSite::Lax)
        .with_secure(state.config.cookie_secure);

    let public = Router::new()
        .route("/", get(home::home))
        .route("/snippet/{id}", get(snippet::show));

    let login = Router::new()
        .route("/user/login", get(user::login_form).post(user::login))
        .route_layer(from_fn(csrf_protect));

    let protected = Router::new()
        .route(
            "/snippet/create",
            get(snippet::create_form).post(snippet::create),
        )
        .route("/user/logout", post(user::logout))
        .route_layer(from_fn(csrf_protect))
        .route_layer(from_fn(require_auth));

    Router::new()
        .merge(public)
        .merge(login)
        .merge(protected)
        .nest_service("/static", ServeDir::new(state.config.static_dir()))
        .fallback(not_found)
        .layer(session_layer)
        .layer(from_fn(secure_headers))
        .layer(from_fn(log_request))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Assemble the request-independent page data: one-shot flash, auth flag,
/// CSRF token, generation year.
pub(crate) async fn page_data(session: &Session) -> Result<PageData, AppError> {
    let flash = session::take_flash(session).await?;
    let authenticated = session::authenticated_user_id(session).await?.is_some();
    let csrf_token = session::csrf_token(session).await?;
    Ok(PageData::new(flash, authenticated, csrf_token))
}

/// Render a cached page into a response.
pub(crate) fn render(state: &AppState, name: &str, data: &PageData) -> Result<Response, AppError> {
    let body = state.templates.render(name, data)?;
    Ok(Html(body).into_response())
}

/// Fallback for paths matching no registered pattern under any method.
async fn not_found() -> Response {
    AppError::NotFound.into_response()
}
