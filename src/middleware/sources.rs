//! Credential source adapters for axum / `http` request types.

use axum::http::{HeaderMap, Uri};
use axum_extra::extract::cookie::CookieJar;

use crate::extract::{CookieSource, CredentialSource, FormSource, HeaderSource};

impl HeaderSource for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }
}

impl CookieSource for CookieJar {
    fn cookie(&self, name: &str) -> Option<String> {
        self.get(name).map(|c| c.value().to_string())
    }
}

/// Decoded `application/x-www-form-urlencoded` pairs from a query string.
///
/// Repeated keys keep every value; lookups return the first.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    #[must_use]
    pub fn parse(query: &str) -> Self {
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    #[must_use]
    pub fn from_uri(uri: &Uri) -> Self {
        uri.query().map(Self::parse).unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl FormSource for QueryParams {
    fn form_value(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }
}

/// One request seen through all three credential capabilities.
pub struct RequestCredentials<'a> {
    headers: &'a HeaderMap,
    cookies: CookieJar,
    query: QueryParams,
}

impl<'a> RequestCredentials<'a> {
    #[must_use]
    pub fn new(headers: &'a HeaderMap, uri: &Uri) -> Self {
        Self {
            headers,
            cookies: CookieJar::from_headers(headers),
            query: QueryParams::from_uri(uri),
        }
    }

    /// The request as header source, then cookie source, then form source.
    #[must_use]
    pub fn sources(&self) -> [CredentialSource<'_>; 3] {
        [
            CredentialSource::Header(self),
            CredentialSource::Cookie(self),
            CredentialSource::Form(self),
        ]
    }
}

impl HeaderSource for RequestCredentials<'_> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.header(name)
    }
}

impl CookieSource for RequestCredentials<'_> {
    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.cookie(name)
    }
}

impl FormSource for RequestCredentials<'_> {
    fn form_value(&self, name: &str) -> Option<String> {
        self.query.form_value(name)
    }
}
