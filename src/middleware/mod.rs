//! Plug-and-play session authentication middleware for Axum.
//!
//! Requests are authenticated from a session token carried in an
//! `Authorization: Bearer` header, a cookie, or a query parameter. Accepted
//! sessions are published into request extensions; everything else is
//! answered with `401` or a redirect, depending on configuration.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use token_session::middleware::{CurrentSession, SessionAuth, SessionAuthConfig, require_session};
//!
//! // 1. Configure once at startup
//! let auth = SessionAuth::new(
//!     SessionAuthConfig::from_env()?
//!         .with_redirect_uri("/login")
//!         .with_auto_refresh(true),
//! );
//!
//! // 2. Protect routes
//! let app = axum::Router::new()
//!     .route("/me", get(|CurrentSession(s): CurrentSession| async move { s.display_name }))
//!     .layer(axum::middleware::from_fn_with_state(auth.clone(), require_session));
//!
//! // 3. Sign in from your login handler
//! let jar = jar.add(auth.sign_in(&Session::new(login, name, now_unix()))?);
//! ```

mod config;
mod cookies;
mod error;
mod extractor;
mod layer;
mod sources;
mod state;

pub use config::{RejectAction, SessionAuthConfig};
pub use error::AuthError;
pub use extractor::{CurrentSession, resolve_session, session_from_extensions};
pub use layer::require_session;
pub use sources::{QueryParams, RequestCredentials};
pub use state::SessionAuth;

/// Re-export cookie types for the sign-in API.
pub use axum_extra::extract::cookie::{Cookie, CookieJar};
