//! Error types for platform interactions.
//!
//! Strongly-typed errors per operation family: authentication, the
//! start-or-join flow, and session control. Notification handling has its own
//! failure policy in `huddle-client` and does not surface errors here.

use thiserror::Error;

use crate::ids::{SessionId, SpaceId};

/// Errors from the login flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The platform rejected the credentials.
    #[error("invalid credentials for {username}")]
    InvalidCredentials {
        /// Username that failed to authenticate.
        username: String,
    },

    /// The platform could not be reached or failed internally.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Errors from starting or joining a conference.
///
/// A failed start/join must leave no partial session reference and no stray
/// subscription behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StartError {
    /// The local user may not start a conference in this space.
    #[error("not permitted to start a conference in space {space}")]
    NotPermitted {
        /// Space the start was attempted in.
        space: SpaceId,
    },

    /// There is no active conference to join in this space.
    #[error("no active conference in space {space}")]
    NothingToJoin {
        /// Space the join was attempted in.
        space: SpaceId,
    },

    /// The platform could not be reached or failed internally.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Errors from session control operations and queries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The session handle no longer refers to a live session.
    #[error("session {0} is gone")]
    SessionGone(SessionId),

    /// Not authenticated.
    #[error("not logged in")]
    NotLoggedIn,

    /// The platform could not be reached or failed internally.
    #[error("platform error: {0}")]
    Other(String),
}
