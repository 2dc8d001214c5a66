//! Request-wrapping middleware.
//!
//! Composition order (outermost first) is fixed by [`crate::routes::router`]:
//! panic recovery, request logging, security headers, then — on the routes
//! that opt in — the authentication gate and CSRF protection.

use std::any::Any;
use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::error::AppError;
use crate::forms::FormData;
use crate::session::{SESSION_CSRF_KEY, authenticated_user_id};

/// Largest form body the CSRF wrapper will buffer.
const FORM_BODY_LIMIT: usize = 1024 * 1024;

/// Convert an unrecovered panic from any inner stage into a generic server
/// error response instead of terminating the connection silently.
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom` as the
/// outermost wrapper. The connection is marked for close: whatever state the
/// panicking handler left behind is not worth reusing.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "request handler panicked");

    let mut response =
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}

/// Record remote address, protocol, method, and path before delegating.
pub async fn log_request(request: Request, next: Next) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.to_string())
        .unwrap_or_else(|| "-".to_string());
    tracing::info!(
        remote = %remote,
        proto = ?request.version(),
        method = %request.method(),
        path = %request.uri().path(),
        "request"
    );
    next.run(request).await
}

/// Unconditionally set anti-XSS and anti-framing headers on every response.
pub async fn secure_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("deny"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}

/// Authentication gate for route-scoped use.
///
/// Without an authenticated-user id in the session the request short-circuits
/// with a redirect to the login page; the inner handler never runs. Pages
/// that do pass are personal, so caches are told to keep out.
pub async fn require_auth(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if authenticated_user_id(&session).await?.is_none() {
        return Ok(Redirect::to("/user/login").into_response());
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

/// Cross-site-request-forgery gate for state-changing routes.
///
/// The expected token lives in the session, which rides an http-only,
/// path-scoped cookie. Safe methods pass through untouched; everything else
/// must carry a matching `csrf_token` form field, checked before the handler
/// runs. The body is buffered for the comparison and re-attached so the
/// handler can parse it again.
pub async fn csrf_protect(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if [Method::GET, Method::HEAD, Method::OPTIONS].contains(request.method()) {
        return Ok(next.run(request).await);
    }

    let expected = session.get::<String>(SESSION_CSRF_KEY).await?;

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, FORM_BODY_LIMIT)
        .await
        .map_err(|_| AppError::Client(StatusCode::BAD_REQUEST))?;
    let form =
        FormData::from_bytes(&bytes).map_err(|_| AppError::Client(StatusCode::BAD_REQUEST))?;

    let submitted = form.get("csrf_token");
    match expected {
        Some(token) if !submitted.is_empty() && submitted == token => {
            let request = Request::from_parts(parts, Body::from(bytes));
            Ok(next.run(request).await)
        }
        _ => Err(AppError::Client(StatusCode::BAD_REQUEST)),
    }
}
