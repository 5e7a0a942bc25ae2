//! Async runtime
//!
//! Event loop that drives terminal I/O and coordinates the App screen state
//! machine, the session coordinator, and the simulated platform. Uses
//! `tokio::select!` so pending control operations never block notification
//! delivery.

use std::io::{self, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use huddle_client::{EventOutcome, SessionCommand, SessionCoordinator};
use huddle_core::{
    ConferencePlatform, Participant, ParticipantId, PlatformError, ServiceEvent, SessionEvent,
    SessionId, SpaceId,
};
use huddle_harness::SimPlatform;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    app::{App, AppAction, AppEvent, JoinOffer, SearchResult},
    input::{InputState, KeyInput},
    surface::TuiSurface,
    ui,
};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Receive from an optional channel slot; pends forever when the slot is
/// empty so the corresponding `select!` arm stays quiet.
async fn recv_opt<T>(slot: &mut Option<UnboundedReceiver<T>>) -> Option<T> {
    match slot {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Map a terminal key event onto the input abstraction.
fn map_key(key: &KeyEvent) -> Option<KeyInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyInput::Esc);
    }
    match key.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}

/// Async runtime for the TUI.
///
/// Manages terminal setup/teardown and the main event loop. The session
/// event receiver is held in an `Option`: dropping it is the platform-side
/// unsubscribe, done exactly when the coordinator reports the terminal
/// transition.
pub struct Runtime {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    platform: SimPlatform,
    app: App,
    input: InputState,
    surface: TuiSurface,
    coordinator: Option<SessionCoordinator>,
    service_events: Option<UnboundedReceiver<ServiceEvent>>,
    session_events: Option<UnboundedReceiver<SessionEvent>>,
}

impl Runtime {
    /// Set up the terminal and create a runtime over the given platform.
    pub fn new(platform: SimPlatform) -> Result<Self, RuntimeError> {
        enable_raw_mode()?;
        let mut out = stdout();
        out.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(out))?;

        Ok(Self {
            terminal,
            platform,
            app: App::new(),
            input: InputState::new(),
            surface: TuiSurface::new(),
            coordinator: None,
            service_events: None,
            session_events: None,
        })
    }

    /// Run the main event loop until quit.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        self.render()?;
        let mut term_events = EventStream::new();
        let result = self.event_loop(&mut term_events).await;
        self.restore_terminal();
        result
    }

    async fn event_loop(&mut self, term_events: &mut EventStream) -> Result<(), RuntimeError> {
        loop {
            tokio::select! {
                maybe_event = term_events.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            if let Some(input) = map_key(&key) {
                                let actions = self.input.handle_key(input, &mut self.app);
                                if self.process_actions(actions).await? {
                                    return Ok(());
                                }
                            }
                        },
                        Some(Ok(Event::Resize(_, _))) => self.render()?,
                        Some(Ok(_)) => {},
                        Some(Err(e)) => return Err(e.into()),
                        None => return Ok(()),
                    }
                },
                event = recv_opt(&mut self.service_events) => {
                    match event {
                        Some(event) => {
                            let actions = self.handle_service_event(event);
                            if self.process_actions(actions).await? {
                                return Ok(());
                            }
                        },
                        None => self.service_events = None,
                    }
                },
                event = recv_opt(&mut self.session_events) => {
                    match event {
                        Some(event) => {
                            let actions = self.handle_session_event(event);
                            if self.process_actions(actions).await? {
                                return Ok(());
                            }
                        },
                        None => self.session_events = None,
                    }
                },
            }
        }
    }

    /// Process actions from the App, feeding resulting events back until the
    /// queue drains.
    async fn process_actions(&mut self, initial: Vec<AppAction>) -> Result<bool, RuntimeError> {
        let mut pending = initial;

        while !pending.is_empty() {
            let actions = std::mem::take(&mut pending);

            for action in actions {
                match action {
                    AppAction::Render => self.render()?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Login { username, password } => {
                        pending.extend(self.do_login(username, password).await);
                    },
                    AppAction::Logout => pending.extend(self.do_logout().await),
                    AppAction::Search { query } => pending.extend(self.do_search(query).await),
                    AppAction::StartOrJoin { space_id } => {
                        pending.extend(self.start_or_join(space_id).await);
                    },
                    AppAction::AcceptOffer { session_id } => {
                        pending.extend(self.join_session(session_id).await);
                    },
                    AppAction::HangUp
                    | AppAction::Mute
                    | AppAction::Unmute
                    | AppAction::AddVideo
                    | AppAction::RemoveVideo => {
                        pending.extend(self.session_control(&action).await);
                    },
                    AppAction::Invite { name } => pending.extend(self.invite(name)),
                }
            }
        }
        Ok(false)
    }

    async fn do_login(&mut self, username: String, password: String) -> Vec<AppAction> {
        match self.platform.login(&username, &password).await {
            Ok(profile) => {
                let mut coordinator = SessionCoordinator::new(profile.id.clone());
                match coordinator.subscribe_service() {
                    Ok(_) => self.service_events = Some(self.platform.subscribe_service()),
                    Err(e) => tracing::warn!(error = %e, "service listener already live"),
                }
                self.coordinator = Some(coordinator);
                self.app.handle(AppEvent::LoggedIn { profile })
            },
            Err(e) => self.app.handle(AppEvent::Error { message: e.to_string() }),
        }
    }

    async fn do_logout(&mut self) -> Vec<AppAction> {
        if let Some(coordinator) = self.coordinator.as_mut() {
            coordinator.release_service();
        }
        self.coordinator = None;
        self.service_events = None;
        if let Err(e) = self.platform.logout().await {
            tracing::warn!(error = %e, "logout failed");
        }
        self.app.handle(AppEvent::LoggedOut)
    }

    async fn do_search(&mut self, query: String) -> Vec<AppAction> {
        match self.platform.search_spaces(&query).await {
            Ok(spaces) => {
                let mut results = Vec::with_capacity(spaces.len());
                for space in spaces {
                    let conference_active = self
                        .platform
                        .is_conference_active(&space.id)
                        .await
                        .unwrap_or(false);
                    results.push(SearchResult { space, conference_active });
                }
                self.app.handle(AppEvent::SearchCompleted { results })
            },
            Err(e) => self.app.handle(AppEvent::Error { message: e.to_string() }),
        }
    }

    /// Start a conference in the space, or join the one already running.
    async fn start_or_join(&mut self, space_id: SpaceId) -> Vec<AppAction> {
        let resolved = self.resolve_session(&space_id).await;
        match resolved {
            Ok(session_id) => self.join_session(session_id).await,
            Err(message) => self.app.handle(AppEvent::Error { message }),
        }
    }

    async fn resolve_session(&mut self, space_id: &SpaceId) -> Result<SessionId, String> {
        let active =
            self.platform.is_conference_active(space_id).await.map_err(|e| e.to_string())?;
        if active {
            // Someone already started one here; join it instead.
            self.platform
                .get_active_conference(space_id)
                .await
                .map(|s| s.id)
                .map_err(|e| e.to_string())
        } else {
            self.platform.start_conference(space_id).await.map(|s| s.id).map_err(|e| e.to_string())
        }
    }

    /// Join a session and hand it to the coordinator.
    ///
    /// The event stream is opened only after the join succeeds and is dropped
    /// again if the attach fails, so a failed start/join leaves no stray
    /// listener.
    async fn join_session(&mut self, session_id: SessionId) -> Vec<AppAction> {
        if let Err(e) = self.platform.join(session_id).await {
            return self.app.handle(AppEvent::Error { message: e.to_string() });
        }
        let snapshot = match self.platform.get_session(session_id).await {
            Ok(s) => s,
            Err(e) => return self.app.handle(AppEvent::Error { message: e.to_string() }),
        };
        let Some(coordinator) = self.coordinator.as_mut() else {
            return self.app.handle(AppEvent::Error { message: "not logged in".to_string() });
        };

        let events = self.platform.subscribe_session(session_id);
        match coordinator.attach_session(&mut self.surface, snapshot) {
            Ok(_) => {
                self.session_events = Some(events);
                self.app.handle(AppEvent::SessionAttached)
            },
            Err(e) => {
                drop(events);
                self.app.handle(AppEvent::Error { message: e.to_string() })
            },
        }
    }

    async fn session_control(&mut self, action: &AppAction) -> Vec<AppAction> {
        let Some(coordinator) = self.coordinator.as_ref() else {
            return vec![];
        };
        let command = match action {
            AppAction::HangUp => coordinator.hang_up_command(),
            AppAction::Mute => coordinator.mute_command(),
            AppAction::Unmute => coordinator.unmute_command(),
            AppAction::AddVideo => coordinator.add_video_command(),
            AppAction::RemoveVideo => coordinator.remove_video_command(),
            _ => None,
        };
        let Some(command) = command else {
            return self.app.handle(AppEvent::Error { message: "no active conference".into() });
        };

        if let Err(e) = self.execute_command(command).await {
            return self.app.handle(AppEvent::Error { message: e.to_string() });
        }
        vec![]
    }

    async fn execute_command(&self, command: SessionCommand) -> Result<(), PlatformError> {
        match command {
            SessionCommand::Leave(id) => self.platform.leave(id).await,
            SessionCommand::Stop(id) => self.platform.stop(id).await,
            SessionCommand::Mute(id) => self.platform.mute(id).await,
            SessionCommand::Unmute(id) => self.platform.unmute(id).await,
            SessionCommand::AddMedia(id, kind) => self.platform.add_media(id, kind).await,
            SessionCommand::RemoveMedia(id, kind) => self.platform.remove_media(id, kind).await,
        }
    }

    /// Simulation: a scripted remote participant joins the current session.
    fn invite(&mut self, name: String) -> Vec<AppAction> {
        let Some(session_id) = self.coordinator.as_ref().and_then(|c| c.session()).map(|s| s.id)
        else {
            return vec![];
        };
        let id = ParticipantId::new(format!("sim-{:06x}", rand::random::<u32>() & 0x00ff_ffff));
        self.platform.remote_joins(session_id, Participant::new(id, name));
        vec![]
    }

    fn handle_service_event(&mut self, event: ServiceEvent) -> Vec<AppAction> {
        match event {
            ServiceEvent::ConferenceStarted { space, session_id, is_mine } => {
                if is_mine {
                    return vec![];
                }
                self.app.handle(AppEvent::OfferAdded { offer: JoinOffer { space, session_id } })
            },
            ServiceEvent::ConferenceEnded { space_id } => {
                tracing::info!(space = %space_id, "conference ended");
                self.app.handle(AppEvent::OffersCleared)
            },
            ServiceEvent::ConnectionStateChanged { state } => {
                tracing::info!(state = state.as_str(), "connection state changed");
                vec![]
            },
        }
    }

    fn handle_session_event(&mut self, event: SessionEvent) -> Vec<AppAction> {
        let Some(coordinator) = self.coordinator.as_mut() else {
            return vec![];
        };
        match coordinator.handle_event(&mut self.surface, event) {
            EventOutcome::Ended => {
                self.session_events = None;
                self.app.handle(AppEvent::SessionEnded)
            },
            EventOutcome::Handled => vec![AppAction::Render],
            EventOutcome::Ignored => vec![],
        }
    }

    fn render(&mut self) -> Result<(), RuntimeError> {
        let Self { terminal, app, surface, input, .. } = self;
        terminal.draw(|frame| ui::render(frame, app, surface, input))?;
        Ok(())
    }

    fn restore_terminal(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!(error = %e, "failed to disable raw mode");
        }
        if let Err(e) = stdout().execute(LeaveAlternateScreen) {
            tracing::warn!(error = %e, "failed to leave alternate screen");
        }
    }
}
