use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use api_types::transaction::{TransactionKind, TransactionRecord};
use chrono_tz::Tz;
use history::{MoneyCents, kind_label};

use crate::{app::AppState, ui::theme::Theme};

pub fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, theme);

    let tz = state.history.timezone();
    let rows = state.history.paged_records();
    let items = rows
        .iter()
        .map(|record| {
            let date = format_when(record, tz, "%d %b %Y %H:%M");
            let kind = kind_label(record.kind);
            let amount = MoneyCents::new(record.amount_minor).to_string();
            let line = Line::from(vec![
                Span::raw(format!("{date}  ")),
                Span::styled(format!("{kind:<10}"), kind_style(record.kind, theme)),
                Span::raw(format!("{amount:>16}  {:<10} ", record.account_number)),
                Span::styled(record.notes.clone(), Style::default().fg(theme.dim)),
            ]);
            ListItem::new(line)
        })
        .collect::<Vec<_>>();

    if items.is_empty() {
        let message = if state.history.loading() {
            "Loading transactions..."
        } else if state.history.is_empty() {
            "No transactions yet."
        } else {
            "No transactions match the current filters."
        };
        frame.render_widget(
            Paragraph::new(Line::from(message))
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            layout[1],
        );
        return;
    }

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected.min(items.len() - 1)));

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, layout[1], &mut list_state);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let view = &state.history;
    let kind = view.filter_kind().map(kind_label).unwrap_or("All");
    let sort = format!(
        "{} {}",
        view.sort_field().as_str(),
        view.sort_direction().arrow()
    );
    let page = format!("{} of {}", view.page(), view.total_pages());

    let line = Line::from(vec![
        Span::styled("Kind", Style::default().fg(theme.dim)),
        Span::raw(format!(": {kind}   ")),
        Span::styled("Date", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}   ", view.filter_date_range().label())),
        Span::styled("Sort", Style::default().fg(theme.dim)),
        Span::raw(format!(": {sort}   ")),
        Span::styled("Page", Style::default().fg(theme.dim)),
        Span::raw(format!(": {page}")),
    ]);

    let block = Block::default().borders(Borders::ALL).title("Transactions");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

pub fn render_detail(frame: &mut Frame<'_>, area: Rect, state: &AppState, id: i64, theme: &Theme) {
    let block = Block::default()
        .title(format!("Transaction {id}"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));

    let Some(record) = state.history.record(id) else {
        frame.render_widget(
            Paragraph::new(Line::from("Transaction not found."))
                .block(block)
                .alignment(Alignment::Center),
            area,
        );
        return;
    };

    let when = format_when(record, state.history.timezone(), "%d %b %Y %H:%M:%S %Z");
    let notes = if record.notes.is_empty() {
        "-"
    } else {
        record.notes.as_str()
    };

    let lines = vec![
        field_line("Kind", kind_label(record.kind).to_string(), theme),
        field_line("When", when, theme),
        field_line(
            "Amount",
            MoneyCents::new(record.amount_minor).to_string(),
            theme,
        ),
        field_line("Account", record.account_number.to_string(), theme),
        field_line("Notes", notes.to_string(), theme),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(label: &'static str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(theme.dim)),
        Span::raw(format!(": {value}")),
    ])
}

fn format_when(record: &TransactionRecord, tz: Tz, pattern: &str) -> String {
    record
        .occurred_at
        .with_timezone(&tz)
        .format(pattern)
        .to_string()
}

fn kind_style(kind: TransactionKind, theme: &Theme) -> Style {
    match kind {
        TransactionKind::Deposit => Style::default().fg(theme.positive),
        TransactionKind::Withdraw => Style::default().fg(theme.negative),
        TransactionKind::Transfer => Style::default().fg(theme.accent),
    }
}
