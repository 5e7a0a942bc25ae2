//! Participant grid
//!
//! Renders one bordered cell per participant, three per row: video state,
//! avatar placeholder, and — on the local cell only — the visible controls.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::surface::{CellView, TuiSurface};

const CELLS_PER_ROW: usize = 3;
const CELL_HEIGHT: u16 = 6;

/// Render the participant grid.
pub fn render(frame: &mut Frame, surface: &TuiSurface, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Conference ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows: Vec<&[CellView]> = surface.cells().chunks(CELLS_PER_ROW).collect();
    if rows.is_empty() {
        return;
    }

    let row_constraints: Vec<Constraint> =
        rows.iter().map(|_| Constraint::Length(CELL_HEIGHT)).collect();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(inner);

    for (cells, row_area) in rows.iter().zip(row_areas.iter()) {
        let cell_constraints: Vec<Constraint> = (0..CELLS_PER_ROW)
            .map(|_| Constraint::Ratio(1, CELLS_PER_ROW as u32))
            .collect();
        let cell_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(cell_constraints)
            .split(*row_area);

        for (cell, cell_area) in cells.iter().zip(cell_areas.iter()) {
            render_cell(frame, cell, *cell_area);
        }
    }
}

fn render_cell(frame: &mut Frame, cell: &CellView, area: Rect) {
    let title_style = if cell.has_controls {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut lines = Vec::new();

    if cell.video_visible {
        lines.push(Line::from(Span::styled(
            " ▣ video",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    } else {
        let avatar = cell.avatar.as_deref().unwrap_or("◉");
        lines.push(Line::from(Span::styled(
            format!(" {avatar}"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if cell.has_controls {
        let controls: Vec<String> =
            cell.visible_controls.iter().map(|c| format!("[{}]", c.label())).collect();
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!(" {}", controls.join(" ")),
            Style::default().fg(Color::Yellow),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {} ", cell.display_name), title_style));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
