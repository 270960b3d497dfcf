//! The UI renders the application state into a document pane and a navigation panel.
//!
//! The document pane shows the viewport's window over the text; the panel lists sections
//! indented by level, with the active one highlighted. Drawing also reports the document
//! pane's height back to the viewport so that the centre line tracks terminal resizes.

use crate::app_state::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Renders the session and syncs the viewport height with the document pane.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[0]);

    let document_block = Block::default()
        .borders(Borders::ALL)
        .title(app.document.path.display().to_string());
    let inner = document_block.inner(panes[0]);
    app.set_viewport_height(usize::from(inner.height));

    draw_document(f, app, document_block, panes[0]);
    draw_navigation(f, app, panes[1]);
    draw_help(f, app, rows[1]);
}

fn draw_document(f: &mut Frame, app: &AppState, block: Block<'_>, area: ratatui::layout::Rect) {
    let active_line = app.active_line();
    let heading_lines: Vec<usize> = app.document.headings.iter().map(|h| h.line).collect();

    let lines: Vec<Line> = app
        .document
        .lines()
        .enumerate()
        .map(|(i, text)| {
            let style = if Some(i) == active_line {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if heading_lines.contains(&i) {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(text.to_string(), style))
        })
        .collect();

    let offset = u16::try_from(app.viewport_offset()).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines).block(block).scroll((offset, 0));
    f.render_widget(paragraph, area);
}

fn draw_navigation(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let sections = app.visible_sections();
    let cursor = app.cursor.min(sections.len().saturating_sub(1));

    let items: Vec<ListItem> = sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let marker = if i == cursor { "▸ " } else { "  " };
            let indent = "  ".repeat(section.level);
            let line = Line::from(vec![
                Span::raw(marker),
                Span::raw(indent),
                Span::raw(section.name.clone()),
            ]);

            let style = if section.is_active {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if i == cursor {
                Style::default().add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let title = app.spy.config().headline.clone();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_help(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let help = app.message.clone().unwrap_or_else(|| {
        "j/k: Scroll | PgUp/PgDn: Page | Tab/Shift+Tab: Select entry | Enter: Jump | q: Quit"
            .to_string()
    });
    let help_widget = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    f.render_widget(help_widget, area);
}
