//! Platform notifications.
//!
//! The hosted platform pushes two streams of notifications: service-level
//! events (outside any single session) and per-session events. Both are
//! closed enums so every handler is an exhaustive match; a new notification
//! kind is a compile-time-checked addition.

use crate::{
    ids::{SessionId, SpaceId},
    participant::{MediaAction, MediaKind, Participant},
    session::SessionStatus,
    space::Space,
};

/// Notifications for one live conference session.
///
/// Delivered one at a time, in order, on the subscriber's event loop. Events
/// carry the data they concern so handlers never have to reach back into the
/// platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session's connection status changed.
    StatusChanged {
        /// New status.
        status: SessionStatus,
    },

    /// A participant's mute state changed (including the local user).
    ParticipantMuteChanged {
        /// Updated participant snapshot.
        participant: Participant,
    },

    /// The participant list changed (join or leave).
    ParticipantListChanged {
        /// Current remote participant list, in platform order.
        participants: Vec<Participant>,
    },

    /// A local media track was added or removed.
    LocalMediaChanged {
        /// Media kind concerned.
        kind: MediaKind,
        /// Whether the track appeared or disappeared.
        action: MediaAction,
    },

    /// A remote participant's media track was added or removed.
    RemoteMediaChanged {
        /// Originating remote participant snapshot.
        participant: Participant,
        /// Media kind concerned.
        kind: MediaKind,
        /// Whether the track appeared or disappeared.
        action: MediaAction,
    },
}

/// Service-level notifications, outside any single session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    /// A conference started somewhere on the platform.
    ConferenceStarted {
        /// Space hosting the new conference.
        space: Space,
        /// Handle of the new session.
        session_id: SessionId,
        /// Whether the conference belongs to the authenticated user.
        is_mine: bool,
    },

    /// An existing conference ended.
    ConferenceEnded {
        /// Space whose conference ended.
        space_id: SpaceId,
    },

    /// The platform connection state changed.
    ConnectionStateChanged {
        /// New connection state.
        state: ConnectionState,
    },
}

/// Platform connection state, logged for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Connected and authenticated.
    Connected,
    /// Connection lost.
    Disconnected,
    /// Reconnection in progress.
    Reconnecting,
}

impl ConnectionState {
    /// Human-readable state label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Reconnecting => "reconnecting",
        }
    }
}
