//! Session age classification.
//!
//! Freshness is never stored. It is recomputed from `last_activity`, the
//! configured [`Lifetime`] and the current time on every request:
//!
//! ```text
//!   0 ──── Fresh ──── lifetime/2 ──── Stale ──── lifetime ──── Expired ────▶ age
//! ```
//!
//! A stale session is still accepted and may be silently refreshed. An
//! expired session is rejected.

use time::OffsetDateTime;

use crate::session::Session;

/// Session lifetime in seconds. Zero or negative disables expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lifetime(pub i64);

impl Lifetime {
    /// Sessions never go stale or expire.
    pub const DISABLED: Self = Self(0);

    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_disabled(self) -> bool {
        self.0 <= 0
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self(3600)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Younger than half the lifetime.
    Fresh,
    /// Past half the lifetime but not yet expired; eligible for refresh.
    Stale,
    /// At or past the lifetime.
    Expired,
}

/// Classifies `session` at unix time `now`.
#[must_use]
pub fn classify(session: &Session, lifetime: Lifetime, now: i64) -> Freshness {
    if lifetime.is_disabled() {
        return Freshness::Fresh;
    }
    let age = now.saturating_sub(session.last_activity);
    let lifetime = lifetime.as_secs();
    if age >= lifetime {
        Freshness::Expired
    } else if age >= lifetime / 2 {
        Freshness::Stale
    } else {
        Freshness::Fresh
    }
}

/// Current wall-clock time as a unix timestamp in seconds.
#[must_use]
pub fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

impl Session {
    #[must_use]
    pub fn freshness(&self, lifetime: Lifetime, now: i64) -> Freshness {
        classify(self, lifetime, now)
    }

    /// Stale sessions should be re-issued with a new `last_activity`.
    #[must_use]
    pub fn needs_refresh(&self, lifetime: Lifetime, now: i64) -> bool {
        self.freshness(lifetime, now) == Freshness::Stale
    }

    #[must_use]
    pub fn is_expired(&self, lifetime: Lifetime, now: i64) -> bool {
        self.freshness(lifetime, now) == Freshness::Expired
    }
}
