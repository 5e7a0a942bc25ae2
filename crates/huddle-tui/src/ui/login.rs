//! Login screen
//!
//! Welcome banner and command reference shown before authentication.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the login screen.
pub fn render(frame: &mut Frame, area: Rect) {
    let title_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::default(),
        Line::from(Span::styled("  Huddle", title_style)),
        Line::from(Span::styled("  Conference client (simulation mode)", dim)),
        Line::default(),
        Line::from("  /login <user> <password>   authenticate"),
        Line::default(),
        Line::from(Span::styled("  After login:", dim)),
        Line::from("  /search <query>            find spaces"),
        Line::from("  /start <n>                 start or join a conference"),
        Line::from("  /join <n>                  accept a join offer"),
        Line::from("  /mute /unmute              toggle audio"),
        Line::from("  /video /novideo            toggle video"),
        Line::from("  /invite <name>             simulate a remote joining"),
        Line::from("  /hangup                    end or leave the conference"),
        Line::from("  /quit                      exit"),
    ];

    let block = Block::default().borders(Borders::ALL).title(" Welcome ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
