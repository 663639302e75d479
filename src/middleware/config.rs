use std::str::FromStr;

use super::error::AuthError;
use crate::extract::TokenNames;
use crate::freshness::Lifetime;

/// What the middleware does with a request that carries no usable session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectAction {
    /// Respond `401 Unauthorized`.
    Unauthorized,
    /// Respond `302 Found` to the given URI.
    Redirect(String),
}

impl RejectAction {
    pub(super) fn rejection(&self) -> AuthError {
        match self {
            Self::Unauthorized => AuthError::Unauthenticated,
            Self::Redirect(uri) => AuthError::Redirect(uri.clone()),
        }
    }
}

/// Session middleware configuration.
///
/// Built once at startup, then handed to [`SessionAuth::new`](super::SessionAuth::new)
/// which shares it read-only across requests. Nothing mutates it afterwards.
///
/// [`Default`] gives a usable configuration: cookie `_user` on `/`, one hour
/// cookie max-age and session lifetime, query parameter `token`, 401 on
/// rejection, no auto-refresh. Override with `with_*` methods or load from
/// the environment with [`from_env()`](SessionAuthConfig::from_env).
#[derive(Debug, Clone)]
pub struct SessionAuthConfig {
    pub(super) reject: RejectAction,
    pub(super) auto_refresh: bool,
    pub(super) names: TokenNames,
    pub(super) cookie_path: String,
    pub(super) cookie_domain: Option<String>,
    pub(super) cookie_max_age_secs: i64,
    pub(super) secure_cookies: bool,
    pub(super) lifetime: Lifetime,
}

impl Default for SessionAuthConfig {
    fn default() -> Self {
        Self {
            reject: RejectAction::Unauthorized,
            auto_refresh: false,
            names: TokenNames::default(),
            cookie_path: "/".into(),
            cookie_domain: None,
            cookie_max_age_secs: 3600,
            secure_cookies: false,
            lifetime: Lifetime::default(),
        }
    }
}

impl SessionAuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables.
    ///
    /// Every variable is optional; unset ones keep their default.
    ///
    /// - `SESSION_REDIRECT_URI`: redirect target for rejected requests (empty = 401)
    /// - `SESSION_AUTO_REFRESH`: `"1"` or `"true"` to re-issue stale sessions
    /// - `SESSION_COOKIE_NAME`, `SESSION_COOKIE_PATH`, `SESSION_COOKIE_DOMAIN`
    /// - `SESSION_COOKIE_MAX_AGE`: cookie max-age in seconds
    /// - `SESSION_SECURE_COOKIES`: `"1"` or `"true"` to mark cookies `Secure`
    /// - `SESSION_TOKEN_PARAM`: query parameter carrying the token
    /// - `SESSION_LIFETIME`: session lifetime in seconds, `0` disables expiry
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(super) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthError> {
        let mut config = Self::default();

        if let Some(uri) = lookup("SESSION_REDIRECT_URI") {
            config = config.with_redirect_uri(uri);
        }
        if let Some(flag) = lookup("SESSION_AUTO_REFRESH") {
            config = config.with_auto_refresh(is_truthy(&flag));
        }
        if let Some(name) = lookup("SESSION_COOKIE_NAME") {
            config = config.with_cookie_name(name);
        }
        if let Some(path) = lookup("SESSION_COOKIE_PATH") {
            config = config.with_cookie_path(path);
        }
        if let Some(domain) = lookup("SESSION_COOKIE_DOMAIN").filter(|d| !d.is_empty()) {
            config = config.with_cookie_domain(domain);
        }
        if let Some(secs) = parse_var(&lookup, "SESSION_COOKIE_MAX_AGE")? {
            config = config.with_cookie_max_age(secs);
        }
        if let Some(flag) = lookup("SESSION_SECURE_COOKIES") {
            config = config.with_secure_cookies(is_truthy(&flag));
        }
        if let Some(param) = lookup("SESSION_TOKEN_PARAM") {
            config = config.with_param_name(param);
        }
        if let Some(secs) = parse_var(&lookup, "SESSION_LIFETIME")? {
            config = config.with_lifetime(Lifetime::from_secs(secs));
        }

        Ok(config)
    }

    /// Redirect rejected requests here instead of answering 401.
    ///
    /// An empty URI selects the 401 response.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        self.reject = if uri.is_empty() {
            RejectAction::Unauthorized
        } else {
            RejectAction::Redirect(uri)
        };
        self
    }

    /// Re-issue the session cookie when a session is past half its lifetime.
    #[must_use]
    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh = enabled;
        self
    }

    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.names.cookie = name.into();
        self
    }

    #[must_use]
    pub fn with_cookie_path(mut self, path: impl Into<String>) -> Self {
        self.cookie_path = path.into();
        self
    }

    #[must_use]
    pub fn with_cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn with_cookie_max_age(mut self, secs: i64) -> Self {
        self.cookie_max_age_secs = secs;
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    /// Query parameter the token may be passed in.
    #[must_use]
    pub fn with_param_name(mut self, name: impl Into<String>) -> Self {
        self.names.param = name.into();
        self
    }

    #[must_use]
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    #[must_use]
    pub fn reject_action(&self) -> &RejectAction {
        &self.reject
    }

    #[must_use]
    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    #[must_use]
    pub fn token_names(&self) -> &TokenNames {
        &self.names
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.names.cookie
    }

    #[must_use]
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true")
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, AuthError>
where
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| AuthError::Config(format!("{key}: {e}")))
        })
        .transpose()
}
