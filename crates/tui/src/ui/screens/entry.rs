use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use history::kind_label;

use crate::{
    app::{AppState, EntryField},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let entry = &state.entry;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(area);

    let lines = EntryField::visible(entry.draft.kind)
        .iter()
        .map(|field| {
            let value = match field {
                EntryField::Kind => format!("‹ {} ›", kind_label(entry.draft.kind)),
                EntryField::Amount => entry.draft.amount.clone(),
                EntryField::Account => entry.draft.account_number.clone(),
                EntryField::ToAccount => entry.draft.to_account_number.clone(),
                EntryField::Notes => entry.draft.notes.clone(),
            };
            let focused = *field == entry.focus;
            let label_style = if focused {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.dim)
            };
            let cursor = if focused && *field != EntryField::Kind {
                "_"
            } else {
                ""
            };
            Line::from(vec![
                Span::styled(format!("{:<11}", field.label()), label_style),
                Span::raw(format!(": {value}{cursor}")),
            ])
        })
        .collect::<Vec<_>>();

    let block = Block::default()
        .title("New transaction")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), layout[0]);

    let status = if entry.submitting {
        Line::from(Span::styled("Submitting...", Style::default().fg(theme.accent)))
    } else if let Some(err) = &entry.error {
        Line::from(Span::styled(err.as_str(), Style::default().fg(theme.error)))
    } else {
        Line::from(Span::styled(
            "Amounts use up to 2 decimals; account numbers have 8 digits.",
            Style::default().fg(theme.dim),
        ))
    };
    frame.render_widget(Paragraph::new(status), layout[1]);
}
