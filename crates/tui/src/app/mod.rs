use std::time::{Duration, Instant};

use api_types::{
    account::AccountTxn,
    transaction::{TransactionKind, TransactionRecord},
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use history::{
    EntryDraft, LoadOutcome, LoadTicket, Route, SortField, TransactionListViewModel,
    TransactionSource, cycle_kind_filter,
};
use tokio::sync::mpsc;

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail(i64),
    Entry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Kind,
    Amount,
    Account,
    ToAccount,
    Notes,
}

impl EntryField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Kind => "Type",
            Self::Amount => "Amount",
            Self::Account => "Account",
            Self::ToAccount => "To account",
            Self::Notes => "Notes",
        }
    }

    /// Fields shown for a kind, in focus order.
    pub fn visible(kind: TransactionKind) -> &'static [EntryField] {
        match kind {
            TransactionKind::Transfer => &[
                Self::Kind,
                Self::Amount,
                Self::Account,
                Self::ToAccount,
                Self::Notes,
            ],
            _ => &[Self::Kind, Self::Amount, Self::Account, Self::Notes],
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntryState {
    pub draft: EntryDraft,
    pub focus: EntryField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for EntryState {
    fn default() -> Self {
        Self {
            draft: EntryDraft::default(),
            focus: EntryField::Kind,
            error: None,
            submitting: false,
        }
    }
}

impl EntryState {
    fn move_focus(&mut self, forward: bool) {
        let fields = EntryField::visible(self.draft.kind);
        let index = fields
            .iter()
            .position(|field| *field == self.focus)
            .unwrap_or(0);
        let next = if forward {
            (index + 1) % fields.len()
        } else {
            (index + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    fn cycle_kind(&mut self, forward: bool) {
        let kinds = TransactionKind::ALL;
        let index = kinds
            .iter()
            .position(|kind| *kind == self.draft.kind)
            .unwrap_or(0);
        let next = if forward {
            (index + 1) % kinds.len()
        } else {
            (index + kinds.len() - 1) % kinds.len()
        };
        self.draft.kind = kinds[next];
    }

    fn active_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            EntryField::Kind => None,
            EntryField::Amount => Some(&mut self.draft.amount),
            EntryField::Account => Some(&mut self.draft.account_number),
            EntryField::ToAccount => Some(&mut self.draft.to_account_number),
            EntryField::Notes => Some(&mut self.draft.notes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
}

impl ToastState {
    fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
        }
    }
}

/// Work the event loop has to perform after a key was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    Reload,
    Submit(TransactionKind, AccountTxn),
}

/// Completion of a spawned fetch, sent back to the event loop.
#[derive(Debug)]
pub struct LoadMessage {
    pub ticket: LoadTicket,
    pub result: std::result::Result<Vec<TransactionRecord>, ClientError>,
}

/// Backend answer to a spawned entry submission.
#[derive(Debug)]
pub struct SubmitMessage {
    pub result: std::result::Result<String, ClientError>,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub history: TransactionListViewModel,
    /// Row highlighted on the current page.
    pub selected: usize,
    pub entry: EntryState,
    pub toast: Option<ToastState>,
    pub customer_id: i64,
    pub base_url: String,
    pub last_refresh: Option<DateTime<Tz>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut history = TransactionListViewModel::new(config.timezone()?);
        history.set_page_size(config.page_size()?);
        history.set_filter_kind(config.kind_filter()?);
        history.set_filter_date_range(config.date_range()?);
        let sort = config.sort_field()?;
        if sort != history.sort_field() {
            history.set_sort(sort);
        }

        Ok(Self {
            screen: Screen::List,
            history,
            selected: 0,
            entry: EntryState::default(),
            toast: None,
            customer_id: config.customer_id,
            base_url: config.base_url.clone(),
            last_refresh: None,
        })
    }

    pub fn handle(&mut self, action: AppAction) -> Effect {
        match self.screen {
            Screen::List => self.handle_list(action),
            Screen::Detail(_) => self.handle_detail(action),
            Screen::Entry => self.handle_entry(action),
        }
    }

    fn handle_list(&mut self, action: AppAction) -> Effect {
        match action {
            AppAction::Quit | AppAction::Input('q') => return Effect::Quit,
            AppAction::Input('r') => return Effect::Reload,
            AppAction::Input('f') => {
                let next = cycle_kind_filter(self.history.filter_kind());
                self.history.set_filter_kind(next);
                self.selected = 0;
            }
            AppAction::Input('d') => {
                let next = self.history.filter_date_range().cycle();
                self.history.set_filter_date_range(next);
                self.selected = 0;
            }
            AppAction::Input('c') => {
                self.history.clear_filters();
                self.selected = 0;
            }
            AppAction::Input('1') => self.history.set_sort(SortField::OccurredAt),
            AppAction::Input('2') => self.history.set_sort(SortField::Amount),
            AppAction::Input('3') => self.history.set_sort(SortField::Kind),
            AppAction::Input('n') | AppAction::Right => {
                if self.history.next_page() {
                    self.selected = 0;
                }
            }
            AppAction::Input('p') | AppAction::Left => {
                if self.history.prev_page() {
                    self.selected = 0;
                }
            }
            AppAction::Input('a') => {
                let route = self.history.add_new();
                self.navigate(route);
            }
            AppAction::Up => self.selected = self.selected.saturating_sub(1),
            AppAction::Down => {
                self.selected += 1;
                self.clamp_selection();
            }
            AppAction::Submit => {
                let route = self
                    .selected_record()
                    .map(|record| self.history.view_details(record));
                if let Some(route) = route {
                    self.navigate(route);
                }
            }
            _ => {}
        }
        Effect::None
    }

    fn handle_detail(&mut self, action: AppAction) -> Effect {
        match action {
            AppAction::Quit | AppAction::Input('q') => Effect::Quit,
            AppAction::Cancel | AppAction::Backspace | AppAction::Input('b') => {
                self.screen = Screen::List;
                Effect::None
            }
            _ => Effect::None,
        }
    }

    fn handle_entry(&mut self, action: AppAction) -> Effect {
        if self.entry.submitting {
            return match action {
                AppAction::Quit => Effect::Quit,
                _ => Effect::None,
            };
        }
        match action {
            AppAction::Quit => return Effect::Quit,
            AppAction::Cancel => {
                self.entry.error = None;
                self.screen = Screen::List;
            }
            AppAction::NextField | AppAction::Down => self.entry.move_focus(true),
            AppAction::PrevField | AppAction::Up => self.entry.move_focus(false),
            AppAction::Left | AppAction::Right if self.entry.focus == EntryField::Kind => {
                self.entry.cycle_kind(action == AppAction::Right);
            }
            AppAction::Input(' ') if self.entry.focus == EntryField::Kind => {
                self.entry.cycle_kind(true);
            }
            AppAction::Input(ch) => {
                if let Some(field) = self.entry.active_field_mut() {
                    field.push(ch);
                }
            }
            AppAction::Backspace => {
                if let Some(field) = self.entry.active_field_mut() {
                    field.pop();
                }
            }
            AppAction::Submit => match self.entry.draft.validate() {
                Ok(txn) => {
                    self.entry.error = None;
                    self.entry.submitting = true;
                    return Effect::Submit(self.entry.draft.kind, txn);
                }
                Err(err) => self.entry.error = Some(err.to_string()),
            },
            _ => {}
        }
        Effect::None
    }

    /// Applies the backend answer to a submitted entry. Returns whether the
    /// history should be reloaded.
    pub fn finish_submit(&mut self, result: std::result::Result<String, ClientError>) -> bool {
        self.entry.submitting = false;
        match result {
            Ok(message) => {
                let kind = self.entry.draft.kind;
                tracing::info!(kind = kind.as_str(), "transaction submitted");
                let message = message.trim();
                let message = if message.is_empty() {
                    "Transaction saved".to_string()
                } else {
                    message.to_string()
                };
                self.toast = Some(ToastState::new(ToastLevel::Success, message));
                self.entry.draft.reset();
                self.entry.focus = EntryField::Kind;
                self.entry.error = None;
                self.screen = Screen::List;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "transaction rejected");
                self.entry.error = Some(message_for_error(&err));
                false
            }
        }
    }

    pub fn apply_load(&mut self, message: LoadMessage) {
        let failure = message.result.as_ref().err().map(message_for_error);
        match self.history.finish_load(message.ticket, message.result) {
            Ok(LoadOutcome::Applied(_)) => {
                self.last_refresh = Some(Utc::now().with_timezone(&self.history.timezone()));
                // A shrunken set can leave the page past the end.
                let total = self.history.total_pages();
                if self.history.page() > total {
                    self.history.go_to_page(total);
                }
                self.clamp_selection();
                if let Screen::Detail(id) = self.screen
                    && self.history.record(id).is_none()
                {
                    self.screen = Screen::List;
                    self.toast = Some(ToastState::new(
                        ToastLevel::Info,
                        format!("Transaction {id} is no longer available"),
                    ));
                }
            }
            Ok(LoadOutcome::Stale) => {}
            Err(err) => {
                tracing::error!(error = %err, "transaction load failed");
                let message = failure.unwrap_or_else(|| err.to_string());
                self.toast = Some(ToastState::new(ToastLevel::Error, message));
            }
        }
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| now.duration_since(toast.created_at) >= TOAST_TTL)
        {
            self.toast = None;
        }
    }

    pub fn selected_record(&self) -> Option<&TransactionRecord> {
        self.history.paged_records().get(self.selected).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.history.paged_records().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn navigate(&mut self, route: Route) {
        tracing::debug!(path = %route.path(), "navigate");
        self.screen = match route {
            Route::Detail { id } => Screen::Detail(id),
            Route::NewEntry => {
                self.entry.error = None;
                self.entry.focus = EntryField::Kind;
                Screen::Entry
            }
        };
    }
}

pub struct App {
    client: Client,
    pub state: AppState,
    loads_tx: mpsc::UnboundedSender<LoadMessage>,
    loads_rx: mpsc::UnboundedReceiver<LoadMessage>,
    submits_tx: mpsc::UnboundedSender<SubmitMessage>,
    submits_rx: mpsc::UnboundedReceiver<SubmitMessage>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url, config.token())?;
        let state = AppState::new(&config)?;
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        let (submits_tx, submits_rx) = mpsc::unbounded_channel();

        Ok(Self {
            client,
            state,
            loads_tx,
            loads_rx,
            submits_tx,
            submits_rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        self.start_load();
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            while let Ok(message) = self.loads_rx.try_recv() {
                self.state.apply_load(message);
            }
            while let Ok(message) = self.submits_rx.try_recv() {
                if self.state.finish_submit(message.result) {
                    self.start_load();
                }
            }
            self.state.expire_toast(Instant::now());

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.state.handle(map_key(key)) {
            Effect::None => {}
            Effect::Quit => self.should_quit = true,
            Effect::Reload => self.start_load(),
            Effect::Submit(kind, txn) => self.start_submit(kind, txn),
        }
    }

    /// Sends the entry in the background; the form stays locked until the
    /// answer is applied.
    fn start_submit(&mut self, kind: TransactionKind, txn: AccountTxn) {
        let client = self.client.clone();
        let sender = self.submits_tx.clone();

        tokio::spawn(async move {
            let result = client.submit(kind, &txn).await;
            if sender.send(SubmitMessage { result }).is_err() {
                tracing::debug!("event loop closed before submit completed");
            }
        });
    }

    /// Fetches in the background; the result is applied on a later tick.
    fn start_load(&mut self) {
        let ticket = self.state.history.begin_load();
        let client = self.client.clone();
        let sender = self.loads_tx.clone();
        let customer_id = self.state.customer_id;

        tokio::spawn(async move {
            let result = client.fetch_transactions(customer_id).await;
            if sender.send(LoadMessage { ticket, result }).is_err() {
                tracing::debug!("event loop closed before load completed");
            }
        });
    }
}

pub fn message_for_error(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized | ClientError::Forbidden => {
            "Not authorized: check the configured token.".to_string()
        }
        ClientError::NotFound => "Customer or account not found.".to_string(),
        ClientError::Conflict(message) => format!("Insufficient funds: {message}"),
        ClientError::Validation(message) => format!("Rejected: {message}"),
        ClientError::Server(message) => format!("Server error: {message}"),
        ClientError::Transport(err) => format!("Server unreachable: {err}"),
    }
}
