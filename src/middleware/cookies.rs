use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use super::config::SessionAuthConfig;

/// Create the session cookie carrying `token`.
pub(super) fn session_cookie(config: &SessionAuthConfig, token: &str) -> Cookie<'static> {
    let mut builder = Cookie::build((config.names.cookie.clone(), token.to_string()))
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .path(config.cookie_path.clone())
        .max_age(Duration::seconds(config.cookie_max_age_secs));

    if let Some(domain) = &config.cookie_domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}

/// Create removal cookie for the session.
pub(super) fn clear_session_cookie(config: &SessionAuthConfig) -> Cookie<'static> {
    let mut builder = Cookie::build((config.names.cookie.clone(), ""))
        .http_only(true)
        .path(config.cookie_path.clone())
        .max_age(Duration::ZERO);

    if let Some(domain) = &config.cookie_domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}
