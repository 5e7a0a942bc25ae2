//! Command input box

use ratatui::{
    Frame,
    layout::{Position, Rect},
    widgets::{Block, Borders, Paragraph},
};

use crate::input::InputState;

/// Render the command input box and place the cursor.
pub fn render(frame: &mut Frame, input: &InputState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Command ");
    frame.render_widget(Paragraph::new(input.buffer()).block(block), area);

    #[allow(clippy::cast_possible_truncation)]
    let cursor_x = area.x.saturating_add(1).saturating_add(input.cursor() as u16);
    frame.set_cursor_position(Position::new(cursor_x, area.y.saturating_add(1)));
}
