//! In-process simulated conferencing platform.
//!
//! [`SimPlatform`] implements [`ConferencePlatform`] without any network:
//! control operations mutate shared state and push notifications onto
//! ordinary channels, so tests and the TUI's simulation mode decide exactly
//! when remote behavior happens via the `script_*`/`remote_*` driver methods.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use huddle_core::{
    AuthError, ConferencePlatform, ConferenceSession, ConnectionState, MediaAction, MediaKind,
    Participant, ParticipantId, PlatformError, ServiceEvent, SessionEvent, SessionId,
    SessionStatus, Space, SpaceId, StartError, UserProfile,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// One simulated space and its conference slot.
#[derive(Debug)]
struct SimSpace {
    space: Space,
    /// Whether the configured user may start a conference here
    /// (owner/organizer).
    startable: bool,
    active: Option<SessionId>,
}

/// One simulated conference session and its listeners.
#[derive(Debug)]
struct SimSession {
    session: ConferenceSession,
    subscribers: Vec<UnboundedSender<SessionEvent>>,
}

#[derive(Debug)]
struct SimState {
    profile: UserProfile,
    logged_in: bool,
    spaces: Vec<SimSpace>,
    next_session: u64,
    sessions: HashMap<SessionId, SimSession>,
    service_subscribers: Vec<UnboundedSender<ServiceEvent>>,
}

/// Deterministic in-process conferencing platform.
///
/// Cloning shares the underlying state, so a test can hold a driver handle
/// while the client under test holds the platform.
#[derive(Debug, Clone)]
pub struct SimPlatform {
    state: Arc<Mutex<SimState>>,
}

impl SimPlatform {
    /// Create a platform for the given user with no spaces.
    pub fn new(profile: UserProfile) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                profile,
                logged_in: false,
                spaces: Vec::new(),
                next_session: 1,
                sessions: HashMap::new(),
                service_subscribers: Vec::new(),
            })),
        }
    }

    /// Add a space. `startable` grants the configured user the right to start
    /// conferences in it.
    #[must_use]
    pub fn with_space(self, space: Space, startable: bool) -> Self {
        self.state().spaces.push(SimSpace { space, startable, active: None });
        self
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The local user as a fresh participant (unmuted, no video).
    fn local_participant(profile: &UserProfile) -> Participant {
        let mut participant = Participant::new(profile.id.clone(), profile.display_name.clone());
        participant.avatar = profile.avatar.clone();
        participant
    }

    fn emit_service(state: &mut SimState, event: &ServiceEvent) {
        state.service_subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn emit_session(sim: &mut SimSession, event: &SessionEvent) {
        sim.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn session_mut<'a>(
        state: &'a mut SimState,
        session: SessionId,
    ) -> Result<&'a mut SimSession, PlatformError> {
        state.sessions.get_mut(&session).ok_or(PlatformError::SessionGone(session))
    }

    // --- scripted remote behavior ------------------------------------------

    /// Start a conference owned by someone else in the space.
    ///
    /// Emits a service-level `ConferenceStarted` with `is_mine: false`, the
    /// trigger for a join offer on the client side.
    pub fn script_foreign_conference(&self, space_id: &SpaceId, owner: Participant) -> SessionId {
        let mut state = self.state();
        let id = SessionId::new(state.next_session);
        state.next_session += 1;

        let local = Self::local_participant(&state.profile);
        let session = ConferenceSession {
            id,
            space: space_id.clone(),
            status: SessionStatus::Unjoined,
            owned_by_local: false,
            local_participant: local,
            participants: vec![owner],
        };
        state.sessions.insert(id, SimSession { session, subscribers: Vec::new() });

        let mut started_in = None;
        for entry in &mut state.spaces {
            if entry.space.id == *space_id {
                entry.active = Some(id);
                started_in = Some(entry.space.clone());
            }
        }
        if let Some(space) = started_in {
            let event = ServiceEvent::ConferenceStarted { space, session_id: id, is_mine: false };
            Self::emit_service(&mut state, &event);
        }

        id
    }

    /// A remote participant joins the conference.
    pub fn remote_joins(&self, session: SessionId, participant: Participant) {
        let mut state = self.state();
        let Ok(sim) = Self::session_mut(&mut state, session) else {
            return;
        };
        sim.session.participants.push(participant);
        let event =
            SessionEvent::ParticipantListChanged { participants: sim.session.participants.clone() };
        Self::emit_session(sim, &event);
    }

    /// A remote participant leaves the conference.
    pub fn remote_leaves(&self, session: SessionId, id: &ParticipantId) {
        let mut state = self.state();
        let Ok(sim) = Self::session_mut(&mut state, session) else {
            return;
        };
        sim.session.participants.retain(|p| p.id != *id);
        let event =
            SessionEvent::ParticipantListChanged { participants: sim.session.participants.clone() };
        Self::emit_session(sim, &event);
    }

    /// A remote participant publishes or retracts video.
    pub fn remote_sets_video(&self, session: SessionId, id: &ParticipantId, on: bool) {
        let mut state = self.state();
        let Ok(sim) = Self::session_mut(&mut state, session) else {
            return;
        };
        let Some(participant) = sim.session.participants.iter_mut().find(|p| p.id == *id) else {
            return;
        };
        participant.has_video = on;
        let snapshot = participant.clone();
        let event = SessionEvent::RemoteMediaChanged {
            participant: snapshot,
            kind: MediaKind::Video,
            action: if on { MediaAction::Added } else { MediaAction::Removed },
        };
        Self::emit_session(sim, &event);
    }

    /// A remote participant mutes or unmutes.
    pub fn remote_sets_mute(&self, session: SessionId, id: &ParticipantId, muted: bool) {
        let mut state = self.state();
        let Ok(sim) = Self::session_mut(&mut state, session) else {
            return;
        };
        let Some(participant) = sim.session.participants.iter_mut().find(|p| p.id == *id) else {
            return;
        };
        participant.is_muted = muted;
        let snapshot = participant.clone();
        let event = SessionEvent::ParticipantMuteChanged { participant: snapshot };
        Self::emit_session(sim, &event);
    }

    /// The conference ends for everyone (remote owner stopped it, or the
    /// platform shut it down).
    pub fn end_conference(&self, session: SessionId) {
        let mut state = self.state();
        if let Ok(sim) = Self::session_mut(&mut state, session) {
            sim.session.status = SessionStatus::Ended;
            let event = SessionEvent::StatusChanged { status: SessionStatus::Ended };
            Self::emit_session(sim, &event);
        }

        let mut ended_space = None;
        for entry in &mut state.spaces {
            if entry.active == Some(session) {
                entry.active = None;
                ended_space = Some(entry.space.id.clone());
            }
        }
        if let Some(space_id) = ended_space {
            let event = ServiceEvent::ConferenceEnded { space_id };
            Self::emit_service(&mut state, &event);
        }
    }

    /// Report a raw status value on the session's stream.
    ///
    /// Lets tests exercise unrecognized and duplicate status notifications.
    pub fn report_status(&self, session: SessionId, status: SessionStatus) {
        let mut state = self.state();
        let Ok(sim) = Self::session_mut(&mut state, session) else {
            return;
        };
        sim.session.status = status.clone();
        let event = SessionEvent::StatusChanged { status };
        Self::emit_session(sim, &event);
    }

    /// Report a platform connection state change.
    pub fn set_connection_state(&self, connection: ConnectionState) {
        let mut state = self.state();
        let event = ServiceEvent::ConnectionStateChanged { state: connection };
        Self::emit_service(&mut state, &event);
    }
}

#[async_trait]
impl ConferencePlatform for SimPlatform {
    async fn login(&self, username: &str, password: &str) -> Result<UserProfile, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials { username: username.to_string() });
        }
        let mut state = self.state();
        state.logged_in = true;
        Self::emit_service(&mut state, &ServiceEvent::ConnectionStateChanged {
            state: ConnectionState::Connected,
        });
        Ok(state.profile.clone())
    }

    async fn logout(&self) -> Result<(), PlatformError> {
        let mut state = self.state();
        state.logged_in = false;
        Self::emit_service(&mut state, &ServiceEvent::ConnectionStateChanged {
            state: ConnectionState::Disconnected,
        });
        Ok(())
    }

    async fn search_spaces(&self, query: &str) -> Result<Vec<Space>, PlatformError> {
        let state = self.state();
        if !state.logged_in {
            return Err(PlatformError::NotLoggedIn);
        }
        let needle = query.to_lowercase();
        Ok(state
            .spaces
            .iter()
            .filter(|s| s.space.name.to_lowercase().contains(&needle))
            .map(|s| s.space.clone())
            .collect())
    }

    async fn is_conference_active(&self, space: &SpaceId) -> Result<bool, PlatformError> {
        let state = self.state();
        Ok(state.spaces.iter().any(|s| s.space.id == *space && s.active.is_some()))
    }

    async fn start_conference(&self, space: &SpaceId) -> Result<ConferenceSession, StartError> {
        let mut state = self.state();
        if !state.logged_in {
            return Err(StartError::Platform("not logged in".to_string()));
        }

        let local = Self::local_participant(&state.profile);
        let Some(entry) = state.spaces.iter_mut().find(|s| s.space.id == *space) else {
            return Err(StartError::Platform(format!("unknown space {space}")));
        };
        if entry.active.is_some() {
            return Err(StartError::Platform(format!(
                "a conference is already active in {space}"
            )));
        }
        if !entry.startable {
            return Err(StartError::NotPermitted { space: space.clone() });
        }

        let id = SessionId::new(state.next_session);
        state.next_session += 1;

        let session = ConferenceSession {
            id,
            space: space.clone(),
            status: SessionStatus::Unjoined,
            owned_by_local: true,
            local_participant: local,
            participants: Vec::new(),
        };
        let snapshot = session.clone();
        state.sessions.insert(id, SimSession { session, subscribers: Vec::new() });

        let mut started_in = None;
        for entry in &mut state.spaces {
            if entry.space.id == *space {
                entry.active = Some(id);
                started_in = Some(entry.space.clone());
            }
        }
        if let Some(space) = started_in {
            let event = ServiceEvent::ConferenceStarted { space, session_id: id, is_mine: true };
            Self::emit_service(&mut state, &event);
        }

        Ok(snapshot)
    }

    async fn get_active_conference(
        &self,
        space: &SpaceId,
    ) -> Result<ConferenceSession, StartError> {
        let state = self.state();
        let active = state
            .spaces
            .iter()
            .find(|s| s.space.id == *space)
            .and_then(|s| s.active)
            .ok_or_else(|| StartError::NothingToJoin { space: space.clone() })?;
        state
            .sessions
            .get(&active)
            .map(|s| s.session.clone())
            .ok_or_else(|| StartError::NothingToJoin { space: space.clone() })
    }

    async fn get_session(&self, session: SessionId) -> Result<ConferenceSession, PlatformError> {
        let state = self.state();
        state
            .sessions
            .get(&session)
            .map(|s| s.session.clone())
            .ok_or(PlatformError::SessionGone(session))
    }

    async fn join(&self, session: SessionId) -> Result<(), PlatformError> {
        let mut state = self.state();
        let sim = Self::session_mut(&mut state, session)?;

        sim.session.status = SessionStatus::Connecting;
        let connecting = SessionEvent::StatusChanged { status: SessionStatus::Connecting };
        Self::emit_session(sim, &connecting);

        sim.session.status = SessionStatus::Connected;
        let connected = SessionEvent::StatusChanged { status: SessionStatus::Connected };
        Self::emit_session(sim, &connected);
        Ok(())
    }

    async fn leave(&self, session: SessionId) -> Result<(), PlatformError> {
        let mut state = self.state();
        let sim = Self::session_mut(&mut state, session)?;
        sim.session.status = SessionStatus::Unjoined;
        let event = SessionEvent::StatusChanged { status: SessionStatus::Unjoined };
        Self::emit_session(sim, &event);
        Ok(())
    }

    async fn stop(&self, session: SessionId) -> Result<(), PlatformError> {
        {
            let state = self.state();
            if !state.sessions.contains_key(&session) {
                return Err(PlatformError::SessionGone(session));
            }
        }
        self.end_conference(session);
        Ok(())
    }

    async fn mute(&self, session: SessionId) -> Result<(), PlatformError> {
        let mut state = self.state();
        let sim = Self::session_mut(&mut state, session)?;
        sim.session.local_participant.is_muted = true;
        let snapshot = sim.session.local_participant.clone();
        let event = SessionEvent::ParticipantMuteChanged { participant: snapshot };
        Self::emit_session(sim, &event);
        Ok(())
    }

    async fn unmute(&self, session: SessionId) -> Result<(), PlatformError> {
        let mut state = self.state();
        let sim = Self::session_mut(&mut state, session)?;
        sim.session.local_participant.is_muted = false;
        let snapshot = sim.session.local_participant.clone();
        let event = SessionEvent::ParticipantMuteChanged { participant: snapshot };
        Self::emit_session(sim, &event);
        Ok(())
    }

    async fn add_media(&self, session: SessionId, kind: MediaKind) -> Result<(), PlatformError> {
        let mut state = self.state();
        let sim = Self::session_mut(&mut state, session)?;
        if kind == MediaKind::Video {
            sim.session.local_participant.has_video = true;
        }
        let event = SessionEvent::LocalMediaChanged { kind, action: MediaAction::Added };
        Self::emit_session(sim, &event);
        Ok(())
    }

    async fn remove_media(
        &self,
        session: SessionId,
        kind: MediaKind,
    ) -> Result<(), PlatformError> {
        let mut state = self.state();
        let sim = Self::session_mut(&mut state, session)?;
        if kind == MediaKind::Video {
            sim.session.local_participant.has_video = false;
        }
        let event = SessionEvent::LocalMediaChanged { kind, action: MediaAction::Removed };
        Self::emit_session(sim, &event);
        Ok(())
    }

    fn subscribe_service(&self) -> UnboundedReceiver<ServiceEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state().service_subscribers.push(tx);
        rx
    }

    fn subscribe_session(&self, session: SessionId) -> UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state();
        if let Some(sim) = state.sessions.get_mut(&session) {
            sim.subscribers.push(tx);
        } else {
            tracing::warn!(session = %session, "subscription to unknown session, stream closed");
        }
        rx
    }
}
