use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

/// Creates a separator span for dividing hint groups.
pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub const LIST: &[KeyHint] = &[
    KeyHint::new("↑↓", "select"),
    KeyHint::new("Enter", "detail"),
    KeyHint::new("f", "kind"),
    KeyHint::new("d", "date"),
    KeyHint::new("c", "clear"),
    KeyHint::new("1/2/3", "sort"),
    KeyHint::new("n/p", "page"),
    KeyHint::new("a", "add"),
    KeyHint::new("r", "reload"),
];

pub const DETAIL: &[KeyHint] = &[KeyHint::new("b", "back"), KeyHint::new("Esc", "back")];

pub const ENTRY: &[KeyHint] = &[
    KeyHint::new("Tab", "next"),
    KeyHint::new("←→", "type"),
    KeyHint::new("Enter", "save"),
    KeyHint::new("Esc", "cancel"),
];

pub const QUIT: &[KeyHint] = &[KeyHint::new("q", "quit")];
