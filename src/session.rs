use derive_more::{Deref, From, Into, IntoIterator};
use serde::{Deserialize, Serialize};

/// Ordered list of names (roles, watched channels) with membership lookup.
///
/// Order is preserved through encoding; duplicates are allowed.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Deref, From, Into, IntoIterator,
)]
#[serde(transparent)]
#[into_iterator(owned, ref)]
pub struct Names(pub Vec<String>);

impl Names {
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|item| item == name)
    }
}

impl<S: Into<String>> FromIterator<S> for Names {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Authenticated principal carried inside a session token.
///
/// Field names on the wire are single-character tags and must never be
/// renumbered: tokens already issued to clients depend on them.
///
/// The record is immutable apart from [`refresh`](Session::refresh), which
/// only advances `last_activity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque primary key of the principal, if the issuer has one.
    #[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Stable login identifier. Must be non-empty for a valid session.
    #[serde(rename = "u", default)]
    pub subject: String,
    #[serde(rename = "n", default)]
    pub display_name: String,
    #[serde(rename = "a", default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Unix timestamp (seconds) of the last sign-in or refresh.
    #[serde(rename = "h", default)]
    pub last_activity: i64,
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<i64>,
    #[serde(rename = "r", default)]
    pub roles: Names,
    #[serde(rename = "w", default)]
    pub watching: Names,
}

impl Session {
    /// Create a session for a freshly signed-in principal.
    ///
    /// `issued_at` becomes `last_activity`.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        issued_at: i64,
    ) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            last_activity: issued_at,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    #[must_use]
    pub fn with_tenant_id(mut self, tenant_id: i64) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    #[must_use]
    pub fn with_roles(mut self, roles: impl Into<Names>) -> Self {
        self.roles = roles.into();
        self
    }

    #[must_use]
    pub fn with_watching(mut self, watching: impl Into<Names>) -> Self {
        self.watching = watching.into();
        self
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// A session without a subject cannot identify anyone.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.subject.is_empty()
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.has(role)
    }

    #[must_use]
    pub fn is_watching(&self, name: &str) -> bool {
        self.watching.has(name)
    }

    /// Mark the session active as of `now`.
    ///
    /// `last_activity` never moves backwards, so a skewed clock cannot
    /// shorten a session.
    pub fn refresh(&mut self, now: i64) {
        self.last_activity = self.last_activity.max(now);
    }
}
