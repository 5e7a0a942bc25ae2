//! Participants and their media state.

use crate::ids::ParticipantId;

/// One party (local or remote) currently in a conference session.
///
/// Created when the platform reports the join, mutated in place on mute and
/// media notifications, removed when the platform reports departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Stable identifier, unique within the session.
    pub id: ParticipantId,
    /// Name shown on the participant's cell.
    pub display_name: String,
    /// Avatar reference, if the platform supplied one.
    pub avatar: Option<String>,
    /// Whether the participant's audio is muted.
    pub is_muted: bool,
    /// Whether the participant currently publishes a video track.
    pub has_video: bool,
}

impl Participant {
    /// Create a participant with default media state (unmuted, no video).
    pub fn new(id: impl Into<ParticipantId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar: None,
            is_muted: false,
            has_video: false,
        }
    }

    /// Set the avatar reference.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Set the muted flag.
    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.is_muted = muted;
        self
    }

    /// Set the video flag.
    #[must_use]
    pub fn with_video(mut self, video: bool) -> Self {
        self.has_video = video;
        self
    }
}

/// Media stream kinds a participant can publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Audio stream.
    Audio,
    /// Video stream.
    Video,
}

/// Direction of a media change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAction {
    /// The media track was added.
    Added,
    /// The media track was removed.
    Removed,
}
