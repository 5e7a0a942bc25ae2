//! Core domain model for Huddle
//!
//! Types and seams shared by every layer of the client: opaque identifiers,
//! participants and sessions, the closed set of platform notifications, and
//! the [`ConferencePlatform`] trait that abstracts the hosted conferencing
//! service.
//!
//! This crate contains no I/O and no reconciliation logic. The session
//! synchronizer lives in `huddle-client`; frontends and the simulated
//! platform live above that.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod event;
mod ids;
mod participant;
mod platform;
mod session;
mod space;

pub use error::{AuthError, PlatformError, StartError};
pub use event::{ConnectionState, ServiceEvent, SessionEvent};
pub use ids::{ParticipantId, SessionId, SpaceId};
pub use participant::{MediaAction, MediaKind, Participant};
pub use platform::ConferencePlatform;
pub use session::{ConferenceSession, SessionStatus};
pub use space::{Space, UserProfile};
