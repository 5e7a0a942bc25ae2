//! Space search results and join offers
//!
//! The main page after login: numbered search result cards and, below them,
//! conferences started elsewhere that can be joined.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::app::App;

/// Render the search results and join offers.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let [results_area, offers_area] = chunks.as_ref() else {
        return;
    };

    render_results(frame, app, *results_area);
    render_offers(frame, app, *offers_area);
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let live_style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);

    let items: Vec<ListItem> = if app.results().is_empty() {
        vec![ListItem::new(Span::styled(
            "No results. Try /search <query>.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.results()
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let index = i.saturating_add(1);
                let mut spans = vec![
                    Span::raw(format!(" {index}. ")),
                    Span::styled(
                        result.space.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ];
                if result.conference_active {
                    spans.push(Span::styled("  ● live", live_style));
                }
                spans.push(Span::styled(
                    format!("   /start {index}"),
                    Style::default().fg(Color::DarkGray),
                ));
                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let block = Block::default().borders(Borders::ALL).title(" Spaces ");
    frame.render_widget(List::new(items).block(block), area);
}

fn render_offers(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = if app.offers().is_empty() {
        vec![ListItem::new(Span::styled(
            "No conferences to join right now.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.offers()
            .iter()
            .enumerate()
            .map(|(i, offer)| {
                let index = i.saturating_add(1);
                ListItem::new(Line::from(vec![
                    Span::raw(format!(" {index}. ")),
                    Span::styled(
                        offer.space.name.clone(),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("   /join {index}"),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect()
    };

    let block = Block::default().borders(Borders::ALL).title(" Conferences in progress ");
    frame.render_widget(List::new(items).block(block), area);
}
