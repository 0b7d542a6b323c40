//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The base layout is a title bar, the article list, and a one-line status
//!   bar.  The drawer and the settings panel are overlays drawn on top with
//!   [`Clear`] underneath.
//! * Row content comes from [`crate::render`]; this module only places it.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::nav::Category;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [title_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_title_bar(app, frame, title_area);
    draw_news_list(app, frame, main_area);
    draw_status_bar(app, frame, status_area);

    if app.shell.drawer_open {
        draw_drawer(app, frame, main_area);
    }
    if app.shell.settings_open {
        draw_settings(app, frame, main_area);
    }
}

fn draw_title_bar(app: &App, frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(" ☰ ", Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::styled(
            format!(" {} ", app.shell.title()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));
    frame.render_widget(title, area);
}

/// Render the article list, or the empty / loading state.
fn draw_news_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    if app.item_count() == 0 {
        let message = if app.is_loading() {
            "Loading…"
        } else {
            "No news found"
        };
        let empty = Paragraph::new(Line::styled(message, Style::default().fg(Color::DarkGray)))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows = app.rows(Utc::now());
    let list = List::new(rows)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_drawer(app: &App, frame: &mut Frame, area: Rect) {
    let [drawer_area] = Layout::horizontal([Constraint::Length(24)]).areas(area);

    let entries: Vec<ListItem> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let marker = if *category == app.shell.current() { "●" } else { " " };
            ListItem::new(format!("{marker} {} {}", i + 1, category.title()))
        })
        .collect();

    let list = List::new(entries)
        .block(Block::default().title(" News ").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::Blue));

    let mut state = ListState::default().with_selected(Some(app.shell.drawer_cursor()));
    frame.render_widget(Clear, drawer_area);
    frame.render_stateful_widget(list, drawer_area, &mut state);
}

fn draw_settings(app: &App, frame: &mut Frame, area: Rect) {
    let [row] = Layout::vertical([Constraint::Length(6)]).flex(Flex::Center).areas(area);
    let [panel] = Layout::horizontal([Constraint::Length(40)]).flex(Flex::Center).areas(row);

    let body = Paragraph::new(vec![
        Line::from(vec![
            Span::raw(" Order by:  "),
            Span::styled(app.settings.order_by.to_string(), Style::default().fg(Color::Cyan)),
            Span::styled("  (o)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::raw(" Page size: "),
            Span::styled(app.settings.page_size.to_string(), Style::default().fg(Color::Cyan)),
            Span::styled("  (+/-)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::raw(""),
        Line::styled(" Esc: close", Style::default().fg(Color::DarkGray)),
    ])
    .block(Block::default().title(" Settings ").borders(Borders::ALL));

    frame.render_widget(Clear, panel);
    frame.render_widget(body, panel);
}

/// Render the bottom status bar, or the search prompt while it is open.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(term) = &app.search_prompt {
        let prompt = Paragraph::new(Line::from(vec![
            Span::styled(" Search: ", Style::default().fg(Color::Cyan)),
            Span::raw(term.as_str()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
            Span::styled("  Enter: go  Esc: cancel", Style::default().fg(Color::DarkGray)),
        ]));
        frame.render_widget(prompt, area);
        return;
    }

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} items", app.item_count()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  Tab: menu  /: search  r: refresh  ↑/↓: scroll  Enter: link"),
    ]));
    frame.render_widget(status, area);
}
