use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::Extensions;
use axum::http::request::Parts;
use derive_more::Deref;

use super::error::AuthError;
use super::sources::RequestCredentials;
use super::state::SessionAuth;
use crate::error::Error;
use crate::extract::extract_token;
use crate::session::Session;

/// Session published by [`require_session`](super::require_session).
///
/// Use as an Axum extractor in route handlers behind the middleware. Returns
/// `401 Unauthorized` if no session was published.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(CurrentSession(session): CurrentSession) -> impl IntoResponse {
///     format!("Hello, {}", session.display_name())
/// }
///
/// // Optional: accessible to both authenticated and anonymous users
/// async fn home(session: Option<CurrentSession>) -> impl IntoResponse {
///     match session {
///         Some(s) => format!("Hello, {}", s.subject()),
///         None => "Hello, guest".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone, Deref)]
pub struct CurrentSession(pub Session);

impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from_extensions(&parts.extensions)
            .cloned()
            .map(Self)
            .ok_or(AuthError::Unauthenticated)
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(session_from_extensions(&parts.extensions).cloned().map(Self))
    }
}

/// The session published for this request, if the middleware accepted it.
#[must_use]
pub fn session_from_extensions(extensions: &Extensions) -> Option<&Session> {
    extensions.get::<Session>()
}

/// Find, decode and validate the session carried by a request.
///
/// Sources are consulted in order: `Authorization: Bearer`, the session
/// cookie, then the token query parameter. No side effects beyond logging.
///
/// # Errors
///
/// - [`Error::NoCredential`] if no source carries a token
/// - [`Error::Decode`] if the token is malformed or has no subject
/// - [`Error::Expired`] if the session is at or past its lifetime
pub fn resolve_session(
    auth: &SessionAuth,
    credentials: &RequestCredentials<'_>,
    now: i64,
) -> Result<Session, Error> {
    let config = auth.config();

    let token =
        extract_token(&credentials.sources(), config.token_names()).ok_or(Error::NoCredential)?;

    let session = Session::decode(&token).inspect_err(|e| {
        tracing::warn!(error = %e, token_len = token.len(), "Session token rejected");
    })?;

    if !session.is_valid() {
        tracing::warn!(token_len = token.len(), "Session token has no subject");
        return Err(Error::Decode("missing subject".into()));
    }

    if session.is_expired(config.lifetime(), now) {
        tracing::info!(
            subject = %session.subject,
            last_activity = session.last_activity,
            "Session expired"
        );
        return Err(Error::Expired {
            subject: session.subject,
        });
    }

    Ok(session)
}
