//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor) and handles
//! character-level key events. Command parsing happens here on Enter.

use crate::{
    app::{App, AppAction},
    commands::{self, Command},
};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Input state for the TUI.
///
/// Manages the text input buffer and cursor position.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position within the buffer.
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key input event.
    ///
    /// Returns actions to process (may be empty for input-only keys, or
    /// contain platform actions for commands).
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor = self.cursor.saturating_add(1);
                vec![AppAction::Render]
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    self.buffer.remove(self.cursor);
                }
                vec![AppAction::Render]
            },
            KeyInput::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
                vec![AppAction::Render]
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                if self.cursor < self.buffer.len() {
                    self.cursor = self.cursor.saturating_add(1);
                }
                vec![AppAction::Render]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![AppAction::Render]
            },
            KeyInput::End => {
                self.cursor = self.buffer.len();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Esc => vec![AppAction::Quit],
        }
    }

    /// Handle Enter key - parse command and call the App API.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if text.is_empty() {
            return vec![];
        }

        match commands::parse(&text) {
            Command::Login { username, password } => app.login(username, password),
            Command::Logout => app.logout(),
            Command::Search { query } => app.search(query),
            Command::Start { index } => app.start(index),
            Command::Join { index } => app.join(index),
            Command::Mute => app.mute(),
            Command::Unmute => app.unmute(),
            Command::Video => app.add_video(),
            Command::NoVideo => app.remove_video(),
            Command::HangUp => app.hang_up(),
            Command::Invite { name } => app.invite(name),
            Command::Quit => app.quit(),
            Command::Unknown { input } => {
                app.set_status(format!("Unknown command: {input}"));
                vec![AppAction::Render]
            },
            Command::InvalidArgs { command, error } => {
                app.set_status(format!("/{command}: {error}"));
                vec![AppAction::Render]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_input_adds_to_buffer() {
        let mut input = InputState::new();
        let mut app = App::new();

        let _ = input.handle_key(KeyInput::Char('h'), &mut app);
        let _ = input.handle_key(KeyInput::Char('i'), &mut app);

        assert_eq!(input.buffer(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_removes_char() {
        let mut input = InputState::new();
        let mut app = App::new();

        let _ = input.handle_key(KeyInput::Char('a'), &mut app);
        let _ = input.handle_key(KeyInput::Char('b'), &mut app);
        let _ = input.handle_key(KeyInput::Backspace, &mut app);

        assert_eq!(input.buffer(), "a");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn enter_clears_buffer_and_dispatches() {
        let mut input = InputState::new();
        let mut app = App::new();

        for c in "/login alice secret".chars() {
            let _ = input.handle_key(KeyInput::Char(c), &mut app);
        }
        let actions = input.handle_key(KeyInput::Enter, &mut app);

        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
        assert!(matches!(actions.as_slice(), [AppAction::Login { .. }, AppAction::Render]));
    }

    #[test]
    fn cursor_movement() {
        let mut input = InputState::new();
        let mut app = App::new();

        let _ = input.handle_key(KeyInput::Char('a'), &mut app);
        let _ = input.handle_key(KeyInput::Char('b'), &mut app);
        let _ = input.handle_key(KeyInput::Char('c'), &mut app);

        let _ = input.handle_key(KeyInput::Home, &mut app);
        assert_eq!(input.cursor(), 0);

        let _ = input.handle_key(KeyInput::End, &mut app);
        assert_eq!(input.cursor(), 3);

        let _ = input.handle_key(KeyInput::Left, &mut app);
        assert_eq!(input.cursor(), 2);

        let _ = input.handle_key(KeyInput::Right, &mut app);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn esc_quits() {
        let mut input = InputState::new();
        let mut app = App::new();
        assert_eq!(input.handle_key(KeyInput::Esc, &mut app), vec![AppAction::Quit]);
    }
}
