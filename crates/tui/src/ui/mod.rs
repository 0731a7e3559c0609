pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Screen};

use components::hints;

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    match state.screen {
        Screen::List => screens::transactions::render_list(frame, layout[1], state, &theme),
        Screen::Detail(id) => {
            screens::transactions::render_detail(frame, layout[1], state, id, &theme)
        }
        Screen::Entry => screens::entry::render(frame, layout[1], state, &theme),
    }
    render_bottom_bar(frame, layout[2], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let (status, status_style) = if state.history.loading() {
        ("LOADING", Style::default().fg(theme.accent))
    } else {
        ("READY", Style::default().fg(theme.positive))
    };

    let line = Line::from(vec![
        Span::styled("Customer", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.customer_id)),
        Span::styled("Server", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Refresh", Style::default().fg(theme.dim)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let context = match state.screen {
        Screen::List => hints::LIST,
        Screen::Detail(_) => hints::DETAIL,
        Screen::Entry => hints::ENTRY,
    };

    let mut parts = hints::hints_to_spans(context, theme);
    if state.screen != Screen::Entry {
        parts.push(hints::hint_separator(theme));
        parts.extend(hints::hints_to_spans(hints::QUIT, theme));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
