//! UI rendering
//!
//! Rendering functions that convert App and surface state into terminal
//! output using ratatui widgets. All functions are pure (no I/O), taking
//! state and returning widget trees.

mod grid;
mod input;
mod login;
mod spaces;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{
    app::{App, Screen},
    input::InputState,
    surface::TuiSurface,
};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, surface: &TuiSurface, input_state: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    match app.screen() {
        Screen::Login => login::render(frame, *main_area),
        Screen::Main => spaces::render(frame, app, *main_area),
        Screen::InCall => grid::render(frame, surface, *main_area),
    }

    input::render(frame, input_state, *input_area);
    status::render(frame, app, surface, *status_area);
}
