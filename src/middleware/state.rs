use std::sync::Arc;

use axum_extra::extract::cookie::Cookie;

use super::config::SessionAuthConfig;
use super::cookies;
use super::error::AuthError;
use crate::session::Session;

/// Shared, read-only session middleware state.
///
/// Cloning is cheap: every clone points at the same immutable
/// [`SessionAuthConfig`].
#[derive(Debug, Clone, Default)]
pub struct SessionAuth {
    config: Arc<SessionAuthConfig>,
}

impl SessionAuth {
    #[must_use]
    pub fn new(config: SessionAuthConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionAuthConfig {
        &self.config
    }

    /// Build the credential cookie for `session`.
    ///
    /// Add the returned cookie to the response (e.g. through a `CookieJar`)
    /// to sign the principal in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Encode`] if the session cannot be encoded. No
    /// cookie is produced in that case.
    pub fn sign_in(&self, session: &Session) -> Result<Cookie<'static>, AuthError> {
        let token = session.encode().inspect_err(|e| {
            tracing::error!(error = %e, subject = %session.subject, "Session encode failed");
        })?;
        Ok(cookies::session_cookie(&self.config, &token))
    }

    /// Build the cookie that clears the credential cookie.
    #[must_use]
    pub fn sign_out(&self) -> Cookie<'static> {
        cookies::clear_session_cookie(&self.config)
    }
}
