//! Conference session status and snapshot model.

use std::fmt;

use crate::{
    ids::{ParticipantId, SessionId, SpaceId},
    participant::Participant,
};

/// Connection status of a conference session.
///
/// The platform reports raw status strings; the recognized ones map onto the
/// closed variants below. Anything else lands in [`SessionStatus::Other`] and
/// is treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// The local user has not joined (initial state, or left after joining).
    Unjoined,
    /// Join in progress.
    Connecting,
    /// The local user is in the conference.
    Connected,
    /// The conference has ended for everyone.
    Ended,
    /// Unrecognized status value reported by the platform.
    Other(String),
}

impl SessionStatus {
    /// Map a raw platform status string onto the closed variant set.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "unjoined" => Self::Unjoined,
            "connecting" => Self::Connecting,
            "connected" => Self::Connected,
            "ended" => Self::Ended,
            other => Self::Other(other.to_string()),
        }
    }

    /// The status as the platform's string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unjoined => "unjoined",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Ended => "ended",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this status ends the current session instance.
    ///
    /// `Ended` means the conference is over; `Unjoined` re-observed after a
    /// join means the local user left it. Both discard the session reference
    /// and all listeners. Unrecognized statuses are never terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended | Self::Unjoined)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one live conference session.
///
/// The coordinator owns exactly one of these while a session is attached and
/// keeps it current from notifications; the platform is the authoritative
/// source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceSession {
    /// Session handle used for control operations.
    pub id: SessionId,
    /// Space hosting the conference.
    pub space: SpaceId,
    /// Current connection status.
    pub status: SessionStatus,
    /// Whether the local user started (owns) this conference.
    pub owned_by_local: bool,
    /// The local user's participant entry.
    pub local_participant: Participant,
    /// Remote participants, in platform order. May or may not include the
    /// local participant depending on the platform; consumers must not
    /// assume either convention.
    pub participants: Vec<Participant>,
}

impl ConferenceSession {
    /// Find a participant (local or remote) by id.
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        if self.local_participant.id == *id {
            return Some(&self.local_participant);
        }
        self.participants.iter().find(|p| p.id == *id)
    }

    /// Find a participant (local or remote) by id, mutably.
    pub fn participant_mut(&mut self, id: &ParticipantId) -> Option<&mut Participant> {
        if self.local_participant.id == *id {
            return Some(&mut self.local_participant);
        }
        self.participants.iter_mut().find(|p| p.id == *id)
    }
}
