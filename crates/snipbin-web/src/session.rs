//! Session keys and helpers.
//!
//! All request-scoped mutable state (flash message, authenticated-user id,
//! CSRF token) lives in the session, behind an explicit [`Session`] handle
//! passed through the call chain. The session store itself is owned by
//! `tower-sessions`; nothing here touches cookies directly.

use hex_fmt::HexFmt;
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

/// Key under which the authenticated user's id is stored.
pub const SESSION_USER_ID_KEY: &str = "authenticated_user_id";

/// Key for the one-shot flash message.
pub const SESSION_FLASH_KEY: &str = "flash";

/// Key for the per-session CSRF token.
pub const SESSION_CSRF_KEY: &str = "csrf_token";

/// Store a one-shot flash message, surfaced on the next rendered page.
pub async fn put_flash(session: &Session, message: &str) -> Result<(), SessionError> {
    session.insert(SESSION_FLASH_KEY, message).await
}

/// Take the flash message out of the session, clearing it.
pub async fn take_flash(session: &Session) -> Result<Option<String>, SessionError> {
    session.remove::<String>(SESSION_FLASH_KEY).await
}

/// The authenticated user's id, if any.
///
/// "Authenticated" means exactly this: an id is present in the session.
pub async fn authenticated_user_id(session: &Session) -> Result<Option<i64>, SessionError> {
    session.get::<i64>(SESSION_USER_ID_KEY).await
}

/// Fetch the session's CSRF token, issuing a fresh one on first use.
pub async fn csrf_token(session: &Session) -> Result<String, SessionError> {
    if let Some(token) = session.get::<String>(SESSION_CSRF_KEY).await? {
        return Ok(token);
    }
    let token = new_csrf_token();
    session.insert(SESSION_CSRF_KEY, token.clone()).await?;
    Ok(token)
}

/// Generate a random 32-byte token, hex-encoded.
fn new_csrf_token() -> String {
    let bytes: [u8; 32] = rand::random();
    format!("{}", HexFmt(bytes))
}
