#![doc = include_str!("../README.md")]

pub mod codec;
pub mod error;
pub mod extract;
pub mod freshness;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod session;

// Re-exports for convenient access
pub use error::Error;
pub use extract::{
    CookieSource, CredentialSource, FormSource, HeaderSource, TokenNames, bearer_token,
    extract_token,
};
pub use freshness::{Freshness, Lifetime, classify, now_unix};
pub use session::{Names, Session};
#[cfg(feature = "middleware")]
pub use middleware::{
    AuthError, CurrentSession, SessionAuth, SessionAuthConfig, require_session,
};
