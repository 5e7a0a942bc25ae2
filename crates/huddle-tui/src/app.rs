//! Application screen state machine.
//!
//! Pure state machine in the same mold as the session coordinator: it
//! consumes [`AppEvent`] inputs and produces [`AppAction`] instructions for
//! the runtime to execute. No I/O, fully testable without a terminal.

use huddle_core::{SessionId, Space, SpaceId, UserProfile};

/// How many search results are shown, matching the platform demo convention.
const MAX_SEARCH_RESULTS: usize = 3;

/// Which page the user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Waiting for `/login`.
    Login,
    /// Search and join-offer page.
    Main,
    /// Active conference with the participant grid.
    InCall,
}

/// One space search result card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The space found.
    pub space: Space,
    /// Whether a conference is already running inside it.
    pub conference_active: bool,
}

/// A joinable foreign conference surfaced by a service notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOffer {
    /// Space hosting the conference.
    pub space: Space,
    /// Session handle to join.
    pub session_id: SessionId,
}

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Login succeeded.
    LoggedIn {
        /// Authenticated user's profile.
        profile: UserProfile,
    },
    /// Logout completed.
    LoggedOut,
    /// Space search finished.
    SearchCompleted {
        /// Result cards, already capped by the runtime.
        results: Vec<SearchResult>,
    },
    /// A foreign conference started and can be joined.
    OfferAdded {
        /// The joinable conference.
        offer: JoinOffer,
    },
    /// A conference somewhere ended; offers are stale.
    OffersCleared,
    /// A session was attached to the coordinator.
    SessionAttached,
    /// The attached session reached a terminal state.
    SessionEnded,
    /// An operation failed; show the message.
    Error {
        /// Error description.
        message: String,
    },
}

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,
    /// Quit the application.
    Quit,
    /// Authenticate against the platform.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// Log out and release the service listener.
    Logout,
    /// Search spaces by name.
    Search {
        /// Search query.
        query: String,
    },
    /// Start a conference in the space, or join the one already running.
    StartOrJoin {
        /// Target space.
        space_id: SpaceId,
    },
    /// Join an offered foreign conference.
    AcceptOffer {
        /// Session to join.
        session_id: SessionId,
    },
    /// End or leave the current conference.
    HangUp,
    /// Mute the local participant.
    Mute,
    /// Unmute the local participant.
    Unmute,
    /// Publish local video.
    AddVideo,
    /// Retract local video.
    RemoveVideo,
    /// Simulation: a scripted remote participant joins the conference.
    Invite {
        /// Display name for the scripted participant.
        name: String,
    },
}

/// Application screen state machine.
#[derive(Debug)]
pub struct App {
    screen: Screen,
    user: Option<UserProfile>,
    results: Vec<SearchResult>,
    offers: Vec<JoinOffer>,
    status_message: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an app on the login screen.
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
            user: None,
            results: Vec::new(),
            offers: Vec::new(),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::LoggedIn { profile } => {
                self.status_message = Some(format!("Logged in as {}", profile.display_name));
                self.user = Some(profile);
                self.screen = Screen::Main;
                vec![AppAction::Render]
            },
            AppEvent::LoggedOut => {
                self.user = None;
                self.results.clear();
                self.offers.clear();
                self.screen = Screen::Login;
                self.status_message = Some("Logged out".to_string());
                vec![AppAction::Render]
            },
            AppEvent::SearchCompleted { results } => {
                self.results = results;
                self.results.truncate(MAX_SEARCH_RESULTS);
                self.status_message = Some(format!("{} space(s) found", self.results.len()));
                vec![AppAction::Render]
            },
            AppEvent::OfferAdded { offer } => {
                // Ignored while in a conference, like the original demo: one
                // call at a time.
                if self.screen == Screen::InCall {
                    return vec![];
                }
                self.status_message =
                    Some(format!("Conference started in {}", offer.space.name));
                self.offers.retain(|o| o.space.id != offer.space.id);
                self.offers.push(offer);
                vec![AppAction::Render]
            },
            AppEvent::OffersCleared => {
                self.offers.clear();
                vec![AppAction::Render]
            },
            AppEvent::SessionAttached => {
                self.screen = Screen::InCall;
                self.results.clear();
                self.offers.clear();
                self.status_message = Some("In conference".to_string());
                vec![AppAction::Render]
            },
            AppEvent::SessionEnded => {
                self.screen = Screen::Main;
                self.status_message = Some("Conference ended".to_string());
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Log in with the given credentials.
    pub fn login(&mut self, username: String, password: String) -> Vec<AppAction> {
        if self.screen != Screen::Login {
            self.set_status("Already logged in");
            return vec![AppAction::Render];
        }
        self.set_status(format!("Logging in as {username}..."));
        vec![AppAction::Login { username, password }, AppAction::Render]
    }

    /// Log out.
    pub fn logout(&mut self) -> Vec<AppAction> {
        if self.screen == Screen::InCall {
            self.set_status("Hang up before logging out");
            return vec![AppAction::Render];
        }
        vec![AppAction::Logout, AppAction::Render]
    }

    /// Search spaces by name.
    pub fn search(&mut self, query: String) -> Vec<AppAction> {
        if self.screen != Screen::Main {
            self.set_status("Log in first");
            return vec![AppAction::Render];
        }
        self.set_status(format!("Searching for '{query}'..."));
        vec![AppAction::Search { query }, AppAction::Render]
    }

    /// Start or join a conference in the n-th search result (1-based).
    pub fn start(&mut self, index: usize) -> Vec<AppAction> {
        let Some(result) = index.checked_sub(1).and_then(|i| self.results.get(i)) else {
            self.set_status("No such search result");
            return vec![AppAction::Render];
        };
        let space_id = result.space.id.clone();
        self.set_status(format!("Starting conference in {}...", result.space.name));
        vec![AppAction::StartOrJoin { space_id }, AppAction::Render]
    }

    /// Join the n-th offered conference (1-based).
    pub fn join(&mut self, index: usize) -> Vec<AppAction> {
        let Some(offer) = index.checked_sub(1).and_then(|i| self.offers.get(i)) else {
            self.set_status("No such offer");
            return vec![AppAction::Render];
        };
        let session_id = offer.session_id;
        self.set_status(format!("Joining conference in {}...", offer.space.name));
        vec![AppAction::AcceptOffer { session_id }, AppAction::Render]
    }

    /// Forward an in-call control command, guarding on the screen.
    fn in_call_action(&mut self, action: AppAction) -> Vec<AppAction> {
        if self.screen != Screen::InCall {
            self.set_status("Not in a conference");
            return vec![AppAction::Render];
        }
        vec![action, AppAction::Render]
    }

    /// End or leave the current conference.
    pub fn hang_up(&mut self) -> Vec<AppAction> {
        self.in_call_action(AppAction::HangUp)
    }

    /// Mute the local participant.
    pub fn mute(&mut self) -> Vec<AppAction> {
        self.in_call_action(AppAction::Mute)
    }

    /// Unmute the local participant.
    pub fn unmute(&mut self) -> Vec<AppAction> {
        self.in_call_action(AppAction::Unmute)
    }

    /// Publish local video.
    pub fn add_video(&mut self) -> Vec<AppAction> {
        self.in_call_action(AppAction::AddVideo)
    }

    /// Retract local video.
    pub fn remove_video(&mut self) -> Vec<AppAction> {
        self.in_call_action(AppAction::RemoveVideo)
    }

    /// Simulation: invite a scripted remote participant.
    pub fn invite(&mut self, name: String) -> Vec<AppAction> {
        self.in_call_action(AppAction::Invite { name })
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Authenticated user, if logged in.
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Current search result cards.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Current join offers.
    pub fn offers(&self) -> &[JoinOffer] {
        &self.offers
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
