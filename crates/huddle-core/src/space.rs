//! Spaces and the authenticated user profile.

use crate::ids::{ParticipantId, SpaceId};

/// A named group space ("bubble") that may host at most one active
/// conference at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    /// Stable space identifier.
    pub id: SpaceId,
    /// Human-readable space name.
    pub name: String,
    /// Avatar reference, if the platform supplied one.
    pub avatar: Option<String>,
}

impl Space {
    /// Create a space without an avatar.
    pub fn new(id: impl Into<SpaceId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), avatar: None }
    }

    /// Set the avatar reference.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// The authenticated user, as reported by the platform after login.
///
/// `id` is the stable identifier used to recognize the local participant's
/// cell inside a conference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Stable user identifier (matches the local participant id).
    pub id: ParticipantId,
    /// Name shown in the page header and on the local cell.
    pub display_name: String,
    /// Company name, if any.
    pub company: Option<String>,
    /// Avatar reference, if any.
    pub avatar: Option<String>,
}

impl UserProfile {
    /// Create a profile with just an id and display name.
    pub fn new(id: impl Into<ParticipantId>, display_name: impl Into<String>) -> Self {
        Self { id: id.into(), display_name: display_name.into(), company: None, avatar: None }
    }
}
