use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::Cookie;

use super::extractor::resolve_session;
use super::sources::RequestCredentials;
use super::state::SessionAuth;
use crate::freshness::now_unix;

/// Middleware that only lets requests with a live session through.
///
/// Rejected requests (no token, bad token, expired session) get the
/// configured [`RejectAction`](super::RejectAction) and never reach the inner
/// handler. Accepted requests carry the decoded [`Session`](crate::Session)
/// in their extensions, readable with [`CurrentSession`](super::CurrentSession).
///
/// The token is read from the `Authorization: Bearer` header, the session
/// cookie, or the token parameter of the query string. The request body is
/// never read, so a token field in an `application/x-www-form-urlencoded`
/// body is ignored.
///
/// With auto-refresh enabled, a stale session is re-stamped and the new
/// credential cookie is written ahead of any cookies set by the handler.
/// Re-stamping uses [`Session::refresh`](crate::Session::refresh), which never
/// moves `last_activity` backwards. A stale session is always older than the
/// current clock, so the refreshed cookie carries `now`. The one exception is
/// a one-second lifetime, where a session stamped this very second is already
/// stale and is re-issued with the same timestamp.
///
/// ```rust,ignore
/// let auth = SessionAuth::new(SessionAuthConfig::from_env()?);
/// let app = Router::new()
///     .route("/me", get(me))
///     .layer(axum::middleware::from_fn_with_state(auth, require_session));
/// ```
pub async fn require_session(
    State(auth): State<SessionAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    let now = now_unix();
    let config = auth.config();

    let resolved = {
        let credentials = RequestCredentials::new(request.headers(), request.uri());
        resolve_session(&auth, &credentials, now)
    };

    let mut session = match resolved {
        Ok(session) => session,
        Err(e) => {
            tracing::debug!(error = %e, path = %request.uri().path(), "Request rejected");
            return config.reject_action().rejection().into_response();
        }
    };

    let mut refreshed = None;
    if config.auto_refresh() && session.needs_refresh(config.lifetime(), now) {
        session.refresh(now);
        match auth.sign_in(&session) {
            Ok(cookie) => {
                tracing::debug!(subject = %session.subject, "Session refreshed");
                refreshed = Some(cookie);
            }
            Err(e) => tracing::warn!(error = %e, "Session refresh skipped"),
        }
    }

    request.extensions_mut().insert(session);
    let mut response = next.run(request).await;

    if let Some(cookie) = refreshed {
        prepend_set_cookie(response.headers_mut(), &cookie);
    }

    response
}

/// Put `cookie` before any `Set-Cookie` headers already on the response, so
/// that a cookie written by the handler (e.g. sign-out) takes precedence.
fn prepend_set_cookie(headers: &mut HeaderMap, cookie: &Cookie<'_>) {
    let value = match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Refreshed session cookie is not a valid header");
            return;
        }
    };

    let existing: Vec<HeaderValue> = headers.get_all(SET_COOKIE).iter().cloned().collect();
    headers.insert(SET_COOKIE, value);
    for v in existing {
        headers.append(SET_COOKIE, v);
    }
}
