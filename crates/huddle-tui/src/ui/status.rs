//! Status bar
//!
//! Displays the current screen, the logged-in user, call information, and the
//! transient status message.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{App, Screen},
    surface::TuiSurface,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, surface: &TuiSurface, area: Rect) {
    let screen = match app.screen() {
        Screen::Login => Span::styled("Logged out", Style::default().fg(Color::Red)),
        Screen::Main => Span::styled("Ready", Style::default().fg(Color::Green)),
        Screen::InCall => Span::styled(
            "In call",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let user_info = app.user().map_or_else(String::new, |user| {
        match &user.company {
            Some(company) => format!(" | {} ({company})", user.display_name),
            None => format!(" | {}", user.display_name),
        }
    });

    let call_info = if app.screen() == Screen::InCall {
        format!(" | Participants: {}", surface.cells().len())
    } else {
        String::new()
    };

    let message = app
        .status_message()
        .map_or_else(String::new, |message| format!(" | {message}"));

    let status_line = Line::from(vec![
        Span::raw(" "),
        screen,
        Span::styled(user_info, Style::default().fg(Color::DarkGray)),
        Span::styled(call_info, Style::default().fg(Color::DarkGray)),
        Span::raw(message),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
