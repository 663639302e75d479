//! Locating the raw session token in a request.
//!
//! The extractor knows nothing about any particular HTTP framework. It works
//! against three small capability traits; adapters for a host framework
//! implement whichever of them that framework can answer. The caller decides
//! the order sources are consulted in, and the first non-empty token wins.

/// Read access to request headers.
pub trait HeaderSource {
    fn header(&self, name: &str) -> Option<&str>;
}

/// Read access to request cookies, looked up by name.
pub trait CookieSource {
    fn cookie(&self, name: &str) -> Option<String>;
}

/// Read access to form or query parameters.
pub trait FormSource {
    fn form_value(&self, name: &str) -> Option<String>;
}

/// One place a token may be found, in the role it is consulted in.
#[derive(Clone, Copy)]
pub enum CredentialSource<'a> {
    Header(&'a dyn HeaderSource),
    Cookie(&'a dyn CookieSource),
    Form(&'a dyn FormSource),
}

/// Cookie and parameter names a token may be carried under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNames {
    pub cookie: String,
    pub param: String,
}

impl Default for TokenNames {
    fn default() -> Self {
        Self {
            cookie: "_user".into(),
            param: "token".into(),
        }
    }
}

const AUTHORIZATION: &str = "authorization";
const BEARER_PREFIX: &str = "bearer ";

/// Returns the first token found in `sources`, consulted in order.
///
/// Per source role:
/// 1. `Authorization: Bearer <token>`, scheme matched case-insensitively
/// 2. the cookie named `names.cookie`
/// 3. the form/query parameter named `names.param`
///
/// Empty values never match. `None` means no source carried a token.
#[must_use]
pub fn extract_token(sources: &[CredentialSource<'_>], names: &TokenNames) -> Option<String> {
    sources.iter().find_map(|source| match source {
        CredentialSource::Header(headers) => headers
            .header(AUTHORIZATION)
            .and_then(bearer_token)
            .map(str::to_owned),
        CredentialSource::Cookie(cookies) => {
            cookies.cookie(&names.cookie).filter(|v| !v.is_empty())
        }
        CredentialSource::Form(form) => form.form_value(&names.param).filter(|v| !v.is_empty()),
    })
}

/// Strips a `Bearer ` scheme prefix. Anything shorter than the prefix, with
/// another scheme, or with nothing after the prefix yields `None`.
#[must_use]
pub fn bearer_token(value: &str) -> Option<&str> {
    let scheme = value.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    Some(&value[BEARER_PREFIX.len()..]).filter(|token| !token.is_empty())
}
