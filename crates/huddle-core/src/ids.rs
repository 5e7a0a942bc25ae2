//! Opaque identifiers for platform entities.
//!
//! The platform hands out string identifiers for participants and spaces and
//! numeric handles for sessions. Newtypes keep them from being mixed up at
//! call sites.

use std::fmt;

/// Stable identifier of a participant, unique within a session.
///
/// The local user's participant is recognized by comparing against the
/// authenticated user's id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Wrap a raw platform identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Identifier of a space ("bubble") that can host a conference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpaceId(String);

impl SpaceId {
    /// Wrap a raw platform identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpaceId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Handle for one live conference session instance.
///
/// A space hosts at most one active conference at a time, but a new
/// conference in the same space gets a fresh session id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Wrap a raw session handle.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
