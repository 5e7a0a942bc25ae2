//! Session status state machine.
//!
//! [`SessionCoordinator`] owns the one nullable session slot and its
//! subscription handle, interprets incoming session notifications, and drives
//! the [`CellGrid`](crate::CellGrid) reconciler. It is the single writer of
//! the session reference; once the terminal transition clears it, any
//! still-queued notification for the old session is dropped by the guard.

use huddle_core::{
    ConferenceSession, MediaAction, MediaKind, ParticipantId, SessionEvent, SessionId,
    SessionStatus,
};
use thiserror::Error;

use crate::{
    grid::CellGrid,
    subscription::{SubscriptionError, SubscriptionId, SubscriptionRegistry, SubscriptionTarget},
    surface::Surface,
};

/// Consecutive notification-handling failures tolerated before the session
/// subscription is forcibly torn down.
const FAILURE_LIMIT: u32 = 8;

/// Control operation the caller should forward to the platform.
///
/// Effects are observed only via subsequent notifications, never as an
/// immediate result — `Stop`/`Leave` are the cooperative way to end a
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Leave the conference, keeping it running for others.
    Leave(SessionId),
    /// Stop the conference for everyone.
    Stop(SessionId),
    /// Mute the local participant.
    Mute(SessionId),
    /// Unmute the local participant.
    Unmute(SessionId),
    /// Publish a local media track.
    AddMedia(SessionId, MediaKind),
    /// Retract a local media track.
    RemoveMedia(SessionId, MediaKind),
}

/// Result of handing one session notification to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum EventOutcome {
    /// Processed against the attached session.
    Handled,
    /// The terminal transition ran; the caller must drop its event stream.
    Ended,
    /// No session is attached (start failed or already torn down); dropped.
    Ignored,
}

/// Errors from attaching a session to the coordinator.
///
/// A failed attach leaves no session reference and no live subscription.
#[derive(Debug, Error)]
pub enum AttachError<E: std::error::Error> {
    /// A session is already attached; detach it first.
    #[error("a conference session is already attached")]
    AlreadyAttached,

    /// The session was already over when attach was attempted.
    #[error("session is already in terminal state {status}")]
    SessionClosed {
        /// Status the session reported.
        status: SessionStatus,
    },

    /// The subscription registry rejected the session target.
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    /// The surface rejected the initial reconciliation.
    #[error("surface rejected the initial reconciliation: {0}")]
    Surface(E),
}

/// One attached session plus its subscription handle.
#[derive(Debug)]
struct ActiveSession {
    session: ConferenceSession,
    subscription: SubscriptionId,
}

/// Interprets session notifications and keeps the rendered grid in sync.
#[derive(Debug)]
pub struct SessionCoordinator {
    /// Authenticated user's id; distinguishes the local participant's cell.
    local_user: ParticipantId,
    subscriptions: SubscriptionRegistry,
    grid: CellGrid,
    /// The one nullable session slot. `None` doubles as the guard against
    /// notifications queued behind the terminal transition.
    active: Option<ActiveSession>,
    /// Consecutive notification-handling failures (circuit breaker).
    failures: u32,
}

impl SessionCoordinator {
    /// Create a coordinator for the given authenticated user.
    pub fn new(local_user: ParticipantId) -> Self {
        Self {
            local_user,
            subscriptions: SubscriptionRegistry::new(),
            grid: CellGrid::new(),
            active: None,
            failures: 0,
        }
    }

    /// The authenticated user's id.
    pub fn local_user(&self) -> &ParticipantId {
        &self.local_user
    }

    /// Snapshot of the attached session, if any.
    pub fn session(&self) -> Option<&ConferenceSession> {
        self.active.as_ref().map(|a| &a.session)
    }

    /// Whether a session is currently attached.
    pub fn has_session(&self) -> bool {
        self.active.is_some()
    }

    /// The rendered cell collection.
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Consecutive notification-handling failures since the last success.
    pub fn consecutive_failures(&self) -> u32 {
        self.failures
    }

    /// Register the service-level listener.
    ///
    /// Goes through the same registry as session listeners, so a second
    /// service subscription without a release in between is rejected.
    pub fn subscribe_service(&mut self) -> Result<SubscriptionId, SubscriptionError> {
        self.subscriptions.subscribe(SubscriptionTarget::Service)
    }

    /// Release the service-level listener. Idempotent.
    pub fn release_service(&mut self) -> Option<SubscriptionId> {
        self.subscriptions.release(SubscriptionTarget::Service)
    }

    /// Attach a freshly started or joined session and build its cells.
    ///
    /// Registers the session's subscription and runs the initial
    /// reconciliation pass. On any failure the subscription is released and
    /// the grid cleared, so nothing partial survives.
    pub fn attach_session<S: Surface>(
        &mut self,
        surface: &mut S,
        session: ConferenceSession,
    ) -> Result<SubscriptionId, AttachError<S::Error>> {
        if self.active.is_some() {
            return Err(AttachError::AlreadyAttached);
        }
        if session.status.is_terminal() {
            return Err(AttachError::SessionClosed { status: session.status });
        }

        let target = SubscriptionTarget::Session(session.id);
        let subscription = self.subscriptions.subscribe(target)?;

        if let Err(e) =
            self.grid.reconcile(surface, &session.local_participant, &session.participants)
        {
            self.subscriptions.release(target);
            if let Err(clear_err) = self.grid.clear(surface) {
                tracing::warn!(error = %clear_err, "surface clear failed after attach failure");
            }
            return Err(AttachError::Surface(e));
        }

        tracing::info!(session = %session.id, space = %session.space, "session attached");
        self.active = Some(ActiveSession { session, subscription });
        self.failures = 0;
        Ok(subscription)
    }

    /// Process one session notification.
    ///
    /// Failures while applying a notification are logged and counted; after
    /// [`FAILURE_LIMIT`] consecutive failures the session subscription is
    /// forcibly torn down instead of silently dropping every later
    /// notification.
    pub fn handle_event<S: Surface>(
        &mut self,
        surface: &mut S,
        event: SessionEvent,
    ) -> EventOutcome {
        if self.active.is_none() {
            tracing::debug!("session notification dropped, no session attached");
            return EventOutcome::Ignored;
        }

        if let SessionEvent::StatusChanged { status } = &event
            && status.is_terminal()
        {
            tracing::info!(status = %status, "session reached terminal state");
            self.teardown(surface);
            return EventOutcome::Ended;
        }

        match self.apply_event(surface, event) {
            Ok(()) => {
                self.failures = 0;
                EventOutcome::Handled
            },
            Err(e) => {
                self.failures += 1;
                tracing::warn!(
                    error = %e,
                    consecutive = self.failures,
                    "notification handling failed"
                );
                if self.failures >= FAILURE_LIMIT {
                    tracing::error!(
                        limit = FAILURE_LIMIT,
                        "failure limit reached, tearing down session subscription"
                    );
                    self.teardown(surface);
                    EventOutcome::Ended
                } else {
                    EventOutcome::Handled
                }
            },
        }
    }

    /// Stop the conference if the local user owns it, leave otherwise.
    pub fn hang_up_command(&self) -> Option<SessionCommand> {
        self.active.as_ref().map(|a| {
            if a.session.owned_by_local {
                SessionCommand::Stop(a.session.id)
            } else {
                SessionCommand::Leave(a.session.id)
            }
        })
    }

    /// Mute the local participant.
    pub fn mute_command(&self) -> Option<SessionCommand> {
        self.active.as_ref().map(|a| SessionCommand::Mute(a.session.id))
    }

    /// Unmute the local participant.
    pub fn unmute_command(&self) -> Option<SessionCommand> {
        self.active.as_ref().map(|a| SessionCommand::Unmute(a.session.id))
    }

    /// Publish local video.
    pub fn add_video_command(&self) -> Option<SessionCommand> {
        self.active.as_ref().map(|a| SessionCommand::AddMedia(a.session.id, MediaKind::Video))
    }

    /// Retract local video.
    pub fn remove_video_command(&self) -> Option<SessionCommand> {
        self.active.as_ref().map(|a| SessionCommand::RemoveMedia(a.session.id, MediaKind::Video))
    }

    /// Terminal transition: release the subscription, discard the session
    /// reference, clear all cells. Idempotent — a second invocation finds the
    /// slot empty and does nothing.
    fn teardown<S: Surface>(&mut self, surface: &mut S) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.subscriptions.release(SubscriptionTarget::Session(active.session.id));
        if let Err(e) = self.grid.clear(surface) {
            tracing::warn!(error = %e, "surface clear failed during teardown");
        }
        self.failures = 0;
        tracing::info!(session = %active.session.id, "session detached");
    }

    /// Apply a non-terminal notification to the session model and the grid.
    fn apply_event<S: Surface>(
        &mut self,
        surface: &mut S,
        event: SessionEvent,
    ) -> Result<(), S::Error> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        let session = &mut active.session;

        match event {
            SessionEvent::StatusChanged { status } => {
                session.status = status.clone();
                if status == SessionStatus::Connected {
                    // Remote participants have not necessarily changed here;
                    // only the local controls are recomputed.
                    self.grid.refresh_controls(surface, &session.local_participant)?;
                } else {
                    tracing::debug!(status = %status, "status change without structural effect");
                }
            },

            SessionEvent::ParticipantMuteChanged { participant } => {
                if let Some(entry) = session.participant_mut(&participant.id) {
                    entry.is_muted = participant.is_muted;
                }
                if participant.id == self.local_user {
                    session.local_participant.is_muted = participant.is_muted;
                    self.grid.refresh_controls(surface, &session.local_participant)?;
                }
            },

            SessionEvent::ParticipantListChanged { participants } => {
                session.participants = participants;
                self.grid.reconcile(
                    surface,
                    &session.local_participant,
                    &session.participants,
                )?;
            },

            SessionEvent::LocalMediaChanged { kind, action } => match kind {
                MediaKind::Video => {
                    let id = session.local_participant.id.clone();
                    match action {
                        MediaAction::Added => {
                            session.local_participant.has_video = true;
                            self.grid.attach_video(surface, &id)?;
                        },
                        MediaAction::Removed => {
                            session.local_participant.has_video = false;
                            self.grid.detach_video(surface, &id)?;
                        },
                    }
                    self.grid.refresh_controls(surface, &session.local_participant)?;
                },
                MediaKind::Audio => {
                    tracing::debug!(?action, "local audio media change has no view effect");
                },
            },

            SessionEvent::RemoteMediaChanged { participant, kind, action } => match kind {
                MediaKind::Video => {
                    if let Some(entry) = session.participant_mut(&participant.id) {
                        entry.has_video = action == MediaAction::Added;
                    }
                    match action {
                        MediaAction::Added => {
                            // List-changed may still be queued behind this
                            // event; create the cell if it is not there yet.
                            self.grid.ensure(surface, &participant, false)?;
                            self.grid.attach_video(surface, &participant.id)?;
                        },
                        MediaAction::Removed => {
                            self.grid.detach_video(surface, &participant.id)?;
                        },
                    }
                },
                MediaKind::Audio => {
                    tracing::debug!(
                        ?action,
                        participant = %participant.id,
                        "remote audio media change has no view effect"
                    );
                },
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use huddle_core::{Participant, SpaceId};
    use huddle_harness::RecordingSurface;

    use super::*;

    fn session_with(remotes: &[&str]) -> ConferenceSession {
        ConferenceSession {
            id: SessionId::new(1),
            space: SpaceId::new("space-1"),
            status: SessionStatus::Connected,
            owned_by_local: true,
            local_participant: Participant::new(ParticipantId::new("me"), "Me"),
            participants: remotes
                .iter()
                .map(|id| Participant::new(ParticipantId::new(*id), *id))
                .collect(),
        }
    }

    fn attached(remotes: &[&str]) -> (SessionCoordinator, RecordingSurface) {
        let mut coordinator = SessionCoordinator::new(ParticipantId::new("me"));
        let mut surface = RecordingSurface::new();
        coordinator.attach_session(&mut surface, session_with(remotes)).unwrap();
        (coordinator, surface)
    }

    #[test]
    fn attach_rejects_terminal_session() {
        let mut coordinator = SessionCoordinator::new(ParticipantId::new("me"));
        let mut surface = RecordingSurface::new();
        let mut session = session_with(&[]);
        session.status = SessionStatus::Ended;

        let err = coordinator.attach_session(&mut surface, session).unwrap_err();
        assert!(matches!(err, AttachError::SessionClosed { .. }));
        assert!(!coordinator.has_session());
        assert!(surface.cell_ids().is_empty());
    }

    #[test]
    fn attach_rejects_second_session() {
        let (mut coordinator, mut surface) = attached(&[]);

        let err = coordinator.attach_session(&mut surface, session_with(&[])).unwrap_err();
        assert!(matches!(err, AttachError::AlreadyAttached));
    }

    #[test]
    fn failed_attach_leaves_no_partial_state() {
        let mut coordinator = SessionCoordinator::new(ParticipantId::new("me"));
        let mut surface = RecordingSurface::new();
        surface.inject_failures(u32::MAX);

        let err = coordinator.attach_session(&mut surface, session_with(&["r1"])).unwrap_err();
        assert!(matches!(err, AttachError::Surface(_)));
        assert!(!coordinator.has_session());
        assert_eq!(coordinator.grid().cell_count(), 0);

        // The session target must be free again.
        surface.inject_failures(0);
        coordinator.attach_session(&mut surface, session_with(&["r1"])).unwrap();
    }

    #[test]
    fn terminal_transition_is_idempotent() {
        let (mut coordinator, mut surface) = attached(&["r1"]);

        let ended = SessionEvent::StatusChanged { status: SessionStatus::Ended };
        assert_eq!(coordinator.handle_event(&mut surface, ended.clone()), EventOutcome::Ended);
        assert_eq!(coordinator.handle_event(&mut surface, ended), EventOutcome::Ignored);

        assert!(!coordinator.has_session());
        assert_eq!(coordinator.grid().cell_count(), 0);
    }

    #[test]
    fn unjoined_after_attach_is_terminal() {
        let (mut coordinator, mut surface) = attached(&[]);

        let outcome = coordinator.handle_event(
            &mut surface,
            SessionEvent::StatusChanged { status: SessionStatus::Unjoined },
        );
        assert_eq!(outcome, EventOutcome::Ended);
        assert!(!coordinator.has_session());
    }

    #[test]
    fn unknown_status_is_ignored_not_terminal() {
        let (mut coordinator, mut surface) = attached(&["r1"]);

        let outcome = coordinator.handle_event(
            &mut surface,
            SessionEvent::StatusChanged { status: SessionStatus::Other("lobby".into()) },
        );
        assert_eq!(outcome, EventOutcome::Handled);
        assert!(coordinator.has_session());
        assert_eq!(coordinator.grid().cell_count(), 2);
    }

    #[test]
    fn events_after_teardown_are_dropped() {
        let (mut coordinator, mut surface) = attached(&["r1"]);

        let _ = coordinator
            .handle_event(&mut surface, SessionEvent::StatusChanged {
                status: SessionStatus::Ended,
            });

        let outcome = coordinator.handle_event(&mut surface, SessionEvent::ParticipantListChanged {
            participants: vec![Participant::new(ParticipantId::new("r2"), "r2")],
        });
        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(coordinator.grid().cell_count(), 0);
        assert!(surface.cell_ids().is_empty());
    }

    #[test]
    fn repeated_failures_trip_the_breaker() {
        let (mut coordinator, mut surface) = attached(&[]);
        surface.inject_failures(u32::MAX);

        let mute = SessionEvent::ParticipantMuteChanged {
            participant: Participant::new(ParticipantId::new("me"), "Me").with_muted(true),
        };

        let mut outcome = EventOutcome::Handled;
        for _ in 0..FAILURE_LIMIT {
            outcome = coordinator.handle_event(&mut surface, mute.clone());
        }

        assert_eq!(outcome, EventOutcome::Ended);
        assert!(!coordinator.has_session());
    }

    #[test]
    fn success_resets_the_failure_count() {
        let (mut coordinator, mut surface) = attached(&[]);

        let mute = SessionEvent::ParticipantMuteChanged {
            participant: Participant::new(ParticipantId::new("me"), "Me").with_muted(true),
        };

        surface.inject_failures(FAILURE_LIMIT - 1);
        for _ in 0..FAILURE_LIMIT - 1 {
            let _ = coordinator.handle_event(&mut surface, mute.clone());
        }
        assert_eq!(coordinator.consecutive_failures(), FAILURE_LIMIT - 1);

        let _ = coordinator.handle_event(&mut surface, mute);
        assert_eq!(coordinator.consecutive_failures(), 0);
        assert!(coordinator.has_session());
    }

    #[test]
    fn hang_up_depends_on_ownership() {
        let (coordinator, _surface) = attached(&[]);
        assert_eq!(coordinator.hang_up_command(), Some(SessionCommand::Stop(SessionId::new(1))));

        let mut guest = SessionCoordinator::new(ParticipantId::new("me"));
        let mut surface = RecordingSurface::new();
        let mut session = session_with(&[]);
        session.owned_by_local = false;
        guest.attach_session(&mut surface, session).unwrap();
        assert_eq!(guest.hang_up_command(), Some(SessionCommand::Leave(SessionId::new(1))));
    }

    #[test]
    fn commands_require_a_session() {
        let coordinator = SessionCoordinator::new(ParticipantId::new("me"));
        assert_eq!(coordinator.hang_up_command(), None);
        assert_eq!(coordinator.mute_command(), None);
        assert_eq!(coordinator.add_video_command(), None);
    }

    #[test]
    fn remote_mute_change_does_not_touch_local_controls() {
        let (mut coordinator, mut surface) = attached(&["r1"]);
        let calls_before = surface.call_count();

        let outcome = coordinator.handle_event(&mut surface, SessionEvent::ParticipantMuteChanged {
            participant: Participant::new(ParticipantId::new("r1"), "r1").with_muted(true),
        });

        assert_eq!(outcome, EventOutcome::Handled);
        assert_eq!(surface.call_count(), calls_before);
        let session = coordinator.session().unwrap();
        assert!(session.participants[0].is_muted);
    }
}
