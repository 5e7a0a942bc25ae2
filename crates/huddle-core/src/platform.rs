//! The conferencing platform seam.
//!
//! [`ConferencePlatform`] abstracts the hosted service the client drives:
//! authentication, space search, conference lifecycle, and session control.
//! The client never talks to a network itself; `huddle-harness` provides a
//! deterministic in-process implementation and a production build would wrap
//! the vendor SDK behind the same trait.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    error::{AuthError, PlatformError, StartError},
    event::{ServiceEvent, SessionEvent},
    ids::{SessionId, SpaceId},
    participant::MediaKind,
    session::ConferenceSession,
    space::{Space, UserProfile},
};

/// Control and query surface of the hosted conferencing platform.
///
/// Start/join/leave/stop and search are asynchronous and may suspend the
/// caller; they must not block notification delivery, so callers multiplex
/// them with the event streams. Control operations take effect only through
/// subsequent notifications — `stop` and `leave` are the cooperative
/// cancellation mechanism, observed via a later status change.
#[async_trait]
pub trait ConferencePlatform {
    /// Authenticate and return the user's profile.
    async fn login(&self, username: &str, password: &str) -> Result<UserProfile, AuthError>;

    /// End the authenticated session.
    async fn logout(&self) -> Result<(), PlatformError>;

    /// Search spaces by name.
    async fn search_spaces(&self, query: &str) -> Result<Vec<Space>, PlatformError>;

    /// Whether a conference is currently active in the space.
    async fn is_conference_active(&self, space: &SpaceId) -> Result<bool, PlatformError>;

    /// Start a conference in the space without joining it.
    async fn start_conference(&self, space: &SpaceId) -> Result<ConferenceSession, StartError>;

    /// Snapshot of the active conference in the space.
    async fn get_active_conference(&self, space: &SpaceId)
    -> Result<ConferenceSession, StartError>;

    /// Fresh snapshot of a session by handle.
    async fn get_session(&self, session: SessionId) -> Result<ConferenceSession, PlatformError>;

    /// Join the conference as the authenticated user.
    async fn join(&self, session: SessionId) -> Result<(), PlatformError>;

    /// Leave the conference, keeping it running for others.
    async fn leave(&self, session: SessionId) -> Result<(), PlatformError>;

    /// Stop the conference for everyone (owner only).
    async fn stop(&self, session: SessionId) -> Result<(), PlatformError>;

    /// Mute the local participant.
    async fn mute(&self, session: SessionId) -> Result<(), PlatformError>;

    /// Unmute the local participant.
    async fn unmute(&self, session: SessionId) -> Result<(), PlatformError>;

    /// Publish a local media track.
    async fn add_media(&self, session: SessionId, kind: MediaKind) -> Result<(), PlatformError>;

    /// Retract a local media track.
    async fn remove_media(&self, session: SessionId, kind: MediaKind)
    -> Result<(), PlatformError>;

    /// Open the service-level notification stream.
    ///
    /// Delivery is asynchronous, one notification at a time, order-preserving.
    /// The one-listener-per-target discipline is the caller's responsibility,
    /// tracked through the subscription registry in `huddle-client`.
    fn subscribe_service(&self) -> UnboundedReceiver<ServiceEvent>;

    /// Open the notification stream for one session.
    ///
    /// Dropping the receiver is the unsubscribe; the platform stops delivering
    /// once the session reaches a terminal state.
    fn subscribe_session(&self, session: SessionId) -> UnboundedReceiver<SessionEvent>;
}
