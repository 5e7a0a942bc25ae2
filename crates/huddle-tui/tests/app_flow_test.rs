//! End-to-end flow test: App screens + session coordinator + simulated
//! platform + terminal surface, without a terminal.
//!
//! Replays the action loop the runtime performs, so the whole login →
//! search → start → call-controls → hang-up journey is exercised headlessly.

use huddle_client::{EventOutcome, SessionCoordinator};
use huddle_core::{
    ConferencePlatform, Participant, ParticipantId, ServiceEvent, SessionEvent, Space, SpaceId,
    UserProfile,
};
use huddle_harness::SimPlatform;
use huddle_tui::{App, AppAction, AppEvent, Screen, SearchResult, TuiSurface};
use tokio::sync::mpsc::UnboundedReceiver;

struct Fixture {
    platform: SimPlatform,
    app: App,
    surface: TuiSurface,
    coordinator: Option<SessionCoordinator>,
    session_events: Option<UnboundedReceiver<SessionEvent>>,
    service_events: Option<UnboundedReceiver<ServiceEvent>>,
}

impl Fixture {
    fn new() -> Self {
        let platform = SimPlatform::new(UserProfile::new(ParticipantId::new("me"), "Me"))
            .with_space(Space::new(SpaceId::new("team"), "Product Team"), true)
            .with_space(Space::new(SpaceId::new("hall"), "All Hands"), false);
        Self {
            platform,
            app: App::new(),
            surface: TuiSurface::new(),
            coordinator: None,
            session_events: None,
            service_events: None,
        }
    }

    /// Execute actions the way the runtime does, minus rendering.
    async fn process(&mut self, initial: Vec<AppAction>) {
        let mut pending = initial;
        while !pending.is_empty() {
            let actions = std::mem::take(&mut pending);
            for action in actions {
                match action {
                    AppAction::Render | AppAction::Quit => {},
                    AppAction::Login { username, password } => {
                        let profile = self.platform.login(&username, &password).await.unwrap();
                        let mut coordinator = SessionCoordinator::new(profile.id.clone());
                        coordinator.subscribe_service().unwrap();
                        self.service_events = Some(self.platform.subscribe_service());
                        self.coordinator = Some(coordinator);
                        pending.extend(self.app.handle(AppEvent::LoggedIn { profile }));
                    },
                    AppAction::Logout => {
                        if let Some(c) = self.coordinator.as_mut() {
                            c.release_service();
                        }
                        self.coordinator = None;
                        self.service_events = None;
                        self.platform.logout().await.unwrap();
                        pending.extend(self.app.handle(AppEvent::LoggedOut));
                    },
                    AppAction::Search { query } => {
                        let spaces = self.platform.search_spaces(&query).await.unwrap();
                        let mut results = Vec::new();
                        for space in spaces {
                            let conference_active =
                                self.platform.is_conference_active(&space.id).await.unwrap();
                            results.push(SearchResult { space, conference_active });
                        }
                        pending.extend(self.app.handle(AppEvent::SearchCompleted { results }));
                    },
                    AppAction::StartOrJoin { space_id } => {
                        let session = if self
                            .platform
                            .is_conference_active(&space_id)
                            .await
                            .unwrap()
                        {
                            self.platform.get_active_conference(&space_id).await
                        } else {
                            self.platform.start_conference(&space_id).await
                        };
                        match session {
                            Ok(session) => pending.extend(self.attach(session.id).await),
                            Err(e) => pending.extend(self.app.handle(AppEvent::Error {
                                message: e.to_string(),
                            })),
                        }
                    },
                    AppAction::AcceptOffer { session_id } => {
                        pending.extend(self.attach(session_id).await);
                    },
                    AppAction::HangUp => {
                        let command =
                            self.coordinator.as_ref().and_then(|c| c.hang_up_command()).unwrap();
                        match command {
                            huddle_client::SessionCommand::Stop(id) => {
                                self.platform.stop(id).await.unwrap();
                            },
                            huddle_client::SessionCommand::Leave(id) => {
                                self.platform.leave(id).await.unwrap();
                            },
                            other => panic!("unexpected hang-up command {other:?}"),
                        }
                    },
                    AppAction::Mute => {
                        let command =
                            self.coordinator.as_ref().and_then(|c| c.mute_command()).unwrap();
                        if let huddle_client::SessionCommand::Mute(id) = command {
                            self.platform.mute(id).await.unwrap();
                        }
                    },
                    AppAction::Unmute => {
                        let command =
                            self.coordinator.as_ref().and_then(|c| c.unmute_command()).unwrap();
                        if let huddle_client::SessionCommand::Unmute(id) = command {
                            self.platform.unmute(id).await.unwrap();
                        }
                    },
                    AppAction::AddVideo => {
                        let command =
                            self.coordinator.as_ref().and_then(|c| c.add_video_command()).unwrap();
                        if let huddle_client::SessionCommand::AddMedia(id, kind) = command {
                            self.platform.add_media(id, kind).await.unwrap();
                        }
                    },
                    AppAction::RemoveVideo => {
                        let command = self
                            .coordinator
                            .as_ref()
                            .and_then(|c| c.remove_video_command())
                            .unwrap();
                        if let huddle_client::SessionCommand::RemoveMedia(id, kind) = command {
                            self.platform.remove_media(id, kind).await.unwrap();
                        }
                    },
                    AppAction::Invite { name } => {
                        let session_id = self
                            .coordinator
                            .as_ref()
                            .and_then(|c| c.session())
                            .map(|s| s.id)
                            .unwrap();
                        let id = ParticipantId::new(format!("sim-{name}"));
                        self.platform.remote_joins(session_id, Participant::new(id, name));
                    },
                }
            }
            self.drain_events().await;
        }
    }

    async fn attach(&mut self, session_id: huddle_core::SessionId) -> Vec<AppAction> {
        self.platform.join(session_id).await.unwrap();
        let snapshot = self.platform.get_session(session_id).await.unwrap();
        let events = self.platform.subscribe_session(session_id);
        let coordinator = self.coordinator.as_mut().unwrap();
        coordinator.attach_session(&mut self.surface, snapshot).unwrap();
        self.session_events = Some(events);
        self.app.handle(AppEvent::SessionAttached)
    }

    /// Deliver all queued platform notifications.
    async fn drain_events(&mut self) {
        let mut app_events = Vec::new();

        let mut session_ended = false;
        if let Some(rx) = self.session_events.as_mut() {
            while let Ok(event) = rx.try_recv() {
                let Some(coordinator) = self.coordinator.as_mut() else {
                    break;
                };
                if coordinator.handle_event(&mut self.surface, event) == EventOutcome::Ended {
                    session_ended = true;
                    app_events.push(AppEvent::SessionEnded);
                    break;
                }
            }
        }
        if session_ended {
            self.session_events = None;
        }

        if let Some(rx) = self.service_events.as_mut() {
            while let Ok(event) = rx.try_recv() {
                match event {
                    ServiceEvent::ConferenceStarted { space, session_id, is_mine } => {
                        if !is_mine {
                            app_events.push(AppEvent::OfferAdded {
                                offer: huddle_tui::JoinOffer { space, session_id },
                            });
                        }
                    },
                    ServiceEvent::ConferenceEnded { .. } => {
                        app_events.push(AppEvent::OffersCleared);
                    },
                    ServiceEvent::ConnectionStateChanged { .. } => {},
                }
            }
        }

        for event in app_events {
            let _ = self.app.handle(event);
        }
    }
}

#[tokio::test]
async fn full_journey_from_login_to_hang_up() {
    let mut fixture = Fixture::new();

    // Login
    let actions = fixture.app.login("me".into(), "secret".into());
    fixture.process(actions).await;
    assert_eq!(fixture.app.screen(), Screen::Main);

    // Search
    let actions = fixture.app.search("team".into());
    fixture.process(actions).await;
    assert_eq!(fixture.app.results().len(), 1);

    // Start a conference via the first result
    let actions = fixture.app.start(1);
    fixture.process(actions).await;
    assert_eq!(fixture.app.screen(), Screen::InCall);
    assert_eq!(fixture.surface.cells().len(), 1);
    assert!(fixture.surface.cells()[0].has_controls);

    // A remote joins
    let actions = fixture.app.invite("Alice".into());
    fixture.process(actions).await;
    assert_eq!(fixture.surface.cells().len(), 2);
    assert!(!fixture.surface.cells()[1].has_controls);

    // Local video on
    let actions = fixture.app.add_video();
    fixture.process(actions).await;
    assert!(fixture.surface.cells()[0].video_visible);

    // Hang up (owner, so the conference stops for everyone)
    let actions = fixture.app.hang_up();
    fixture.process(actions).await;
    assert_eq!(fixture.app.screen(), Screen::Main);
    assert!(fixture.surface.cells().is_empty());
    assert!(!fixture.coordinator.as_ref().unwrap().has_session());
}

#[tokio::test]
async fn foreign_conference_becomes_an_offer_and_is_joinable() {
    let mut fixture = Fixture::new();

    let actions = fixture.app.login("me".into(), "secret".into());
    fixture.process(actions).await;

    let owner = Participant::new(ParticipantId::new("alice"), "Alice");
    fixture.platform.script_foreign_conference(&SpaceId::new("hall"), owner);
    fixture.drain_events().await;
    assert_eq!(fixture.app.offers().len(), 1);

    let actions = fixture.app.join(1);
    fixture.process(actions).await;
    assert_eq!(fixture.app.screen(), Screen::InCall);

    // Local cell plus the conference owner.
    assert_eq!(fixture.surface.cells().len(), 2);

    // Guest hang-up leaves rather than stopping.
    let actions = fixture.app.hang_up();
    fixture.process(actions).await;
    assert_eq!(fixture.app.screen(), Screen::Main);
    assert!(fixture.surface.cells().is_empty());
}
