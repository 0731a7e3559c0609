//! Client-side transaction list: filter, sort and paginate over the full
//! record set of one owner.
//!
//! The view-model owns its state exclusively. Every derived view
//! ([`filtered_records`], [`total_pages`], [`paged_records`]) is recomputed
//! from the current state on each call, so it is always consistent with the
//! last mutation.
//!
//! Loads are split in [`begin_load`] and [`finish_load`] so the fetch itself
//! can run elsewhere (a background task in the terminal shell). Each
//! `begin_load` hands out a [`LoadTicket`]; only the ticket of the most recent
//! load is allowed to write the record set.
//!
//!  [`filtered_records`]: TransactionListViewModel::filtered_records
//!  [`total_pages`]: TransactionListViewModel::total_pages
//!  [`paged_records`]: TransactionListViewModel::paged_records
//!  [`begin_load`]: TransactionListViewModel::begin_load
//!  [`finish_load`]: TransactionListViewModel::finish_load

use std::{collections::HashSet, num::NonZeroUsize};

use api_types::transaction::{TransactionKind, TransactionRecord};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    DateRange, HistoryError, ResultHistory, SortDirection, SortField, source::TransactionSource,
};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Navigation targets requested by the list. Addressing is up to the router.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Detail { id: i64 },
    NewEntry,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Detail { id } => format!("transactions/{id}"),
            Self::NewEntry => "transactions/add".to_string(),
        }
    }
}

/// Handle for one in-flight load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
}

/// What `finish_load` did with a successful completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The record set was replaced with this many records.
    Applied(usize),
    /// A newer load was started after this one; the result was dropped.
    Stale,
}

#[derive(Debug, Clone)]
pub struct TransactionListViewModel {
    records: Vec<TransactionRecord>,
    filter_kind: Option<TransactionKind>,
    filter_date_range: DateRange,
    sort_field: SortField,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
    loading: bool,
    generation: u64,
    timezone: Tz,
}

impl Default for TransactionListViewModel {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl TransactionListViewModel {
    /// Creates an empty view. `timezone` defines the calendar used by the
    /// `Today`, `ThisMonth` and `LastMonth` ranges.
    pub fn new(timezone: Tz) -> Self {
        Self {
            records: Vec::new(),
            filter_kind: None,
            filter_date_range: DateRange::All,
            sort_field: SortField::OccurredAt,
            sort_direction: SortDirection::Desc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            loading: false,
            generation: 0,
            timezone,
        }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, id: i64) -> Option<&TransactionRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn filter_kind(&self) -> Option<TransactionKind> {
        self.filter_kind
    }

    pub fn filter_date_range(&self) -> DateRange {
        self.filter_date_range
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Fetches the records of `owner_id` and replaces the current set.
    ///
    /// On failure the previous records are kept and the error is returned;
    /// `loading` is cleared either way.
    pub async fn load<S>(&mut self, source: &S, owner_id: i64) -> ResultHistory<LoadOutcome>
    where
        S: TransactionSource,
    {
        let ticket = self.begin_load();
        let result = source.fetch_transactions(owner_id).await;
        self.finish_load(ticket, result)
    }

    /// Marks a load as started and returns its ticket. Any ticket handed out
    /// earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        tracing::debug!(generation = self.generation, "transaction load started");
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Applies the completion of the load identified by `ticket`.
    ///
    /// A stale completion changes nothing, errors included: the newer load
    /// still owns `loading`.
    pub fn finish_load<E>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<TransactionRecord>, E>,
    ) -> ResultHistory<LoadOutcome>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        if ticket.generation != self.generation {
            tracing::warn!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale transaction load"
            );
            return Ok(LoadOutcome::Stale);
        }

        self.loading = false;
        match result {
            Ok(records) => {
                warn_duplicate_ids(&records);
                let count = records.len();
                self.records = records;
                tracing::info!(count, "transactions loaded");
                Ok(LoadOutcome::Applied(count))
            }
            Err(err) => {
                tracing::warn!(error = %err, "transaction load failed");
                Err(HistoryError::fetch(err))
            }
        }
    }

    pub fn set_filter_kind(&mut self, kind: Option<TransactionKind>) {
        self.filter_kind = kind;
        self.page = 1;
    }

    pub fn set_filter_date_range(&mut self, range: DateRange) {
        self.filter_date_range = range;
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filter_kind = None;
        self.filter_date_range = DateRange::All;
        self.page = 1;
    }

    /// Sorting on the current field flips the direction; a new field starts
    /// descending. The page is kept.
    pub fn set_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.toggle();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Desc;
        }
    }

    /// Sets the page size and goes back to the first page.
    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size.get();
        self.page = 1;
    }

    /// Moves to page `n` if `1 <= n <= total_pages()`. Returns `false` and
    /// leaves the page untouched otherwise.
    pub fn go_to_page(&mut self, n: usize) -> bool {
        self.go_to_page_at(n, Utc::now())
    }

    pub fn go_to_page_at(&mut self, n: usize, now: DateTime<Utc>) -> bool {
        if n < 1 || n > self.total_pages_at(now) {
            return false;
        }
        self.page = n;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// Records passing the kind and date filters, sorted.
    pub fn filtered_records(&self) -> Vec<&TransactionRecord> {
        self.filtered_records_at(Utc::now())
    }

    pub fn filtered_records_at(&self, now: DateTime<Utc>) -> Vec<&TransactionRecord> {
        let now = now.with_timezone(&self.timezone);
        let mut filtered: Vec<&TransactionRecord> = self
            .records
            .iter()
            .filter(|record| self.filter_kind.is_none_or(|kind| record.kind == kind))
            .filter(|record| self.filter_date_range.contains(&record.occurred_at, &now))
            .collect();

        // `sort_by` is stable: equal keys keep their server order.
        let (field, direction) = (self.sort_field, self.sort_direction);
        filtered.sort_by(|a, b| direction.apply(field.compare(a, b)));
        filtered
    }

    /// Never less than 1, even with nothing to show.
    pub fn total_pages(&self) -> usize {
        self.total_pages_at(Utc::now())
    }

    pub fn total_pages_at(&self, now: DateTime<Utc>) -> usize {
        self.filtered_records_at(now)
            .len()
            .div_ceil(self.page_size)
            .max(1)
    }

    /// Current page of the filtered set. Empty when the page lies past the
    /// end; no clamping happens here.
    pub fn paged_records(&self) -> Vec<&TransactionRecord> {
        self.paged_records_at(Utc::now())
    }

    pub fn paged_records_at(&self, now: DateTime<Utc>) -> Vec<&TransactionRecord> {
        let start = self.page.saturating_sub(1).saturating_mul(self.page_size);
        self.filtered_records_at(now)
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    pub fn view_details(&self, record: &TransactionRecord) -> Route {
        Route::Detail { id: record.id }
    }

    pub fn add_new(&self) -> Route {
        Route::NewEntry
    }
}

fn warn_duplicate_ids(records: &[TransactionRecord]) {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            tracing::warn!(id = record.id, "duplicate transaction id in fetched set");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};

    use super::*;

    fn record(id: i64, kind: TransactionKind, amount_minor: i64) -> TransactionRecord {
        TransactionRecord {
            id,
            kind,
            amount_minor,
            notes: String::new(),
            occurred_at: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .unwrap(),
            account_number: 12345678,
        }
    }

    fn loaded(records: Vec<TransactionRecord>) -> TransactionListViewModel {
        let mut view = TransactionListViewModel::default();
        let ticket = view.begin_load();
        view.finish_load::<std::io::Error>(ticket, Ok(records))
            .unwrap();
        view
    }

    #[test]
    fn defaults() {
        let view = TransactionListViewModel::default();
        assert_eq!(view.filter_kind(), None);
        assert_eq!(view.filter_date_range(), DateRange::All);
        assert_eq!(view.sort_field(), SortField::OccurredAt);
        assert_eq!(view.sort_direction(), SortDirection::Desc);
        assert_eq!(view.page(), 1);
        assert_eq!(view.page_size(), 10);
        assert!(!view.loading());
        assert!(view.is_empty());
    }

    #[test]
    fn filter_setters_reset_page() {
        let records = (1..=30)
            .map(|id| record(id, TransactionKind::Deposit, id))
            .collect();
        let mut view = loaded(records);
        assert!(view.go_to_page(3));

        view.set_filter_kind(Some(TransactionKind::Deposit));
        assert_eq!(view.page(), 1);

        assert!(view.go_to_page(2));
        view.set_filter_date_range(DateRange::All);
        assert_eq!(view.page(), 1);

        assert!(view.go_to_page(2));
        view.clear_filters();
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn set_sort_keeps_page() {
        let records = (1..=30)
            .map(|id| record(id, TransactionKind::Deposit, id))
            .collect();
        let mut view = loaded(records);
        assert!(view.go_to_page(2));
        view.set_sort(SortField::Amount);
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn page_size_resets_page() {
        let records = (1..=30)
            .map(|id| record(id, TransactionKind::Deposit, id))
            .collect();
        let mut view = loaded(records);
        assert!(view.go_to_page(3));
        view.set_page_size(NonZeroUsize::new(5).unwrap());
        assert_eq!(view.page(), 1);
        assert_eq!(view.total_pages(), 6);
    }

    #[test]
    fn next_and_prev_stay_in_bounds() {
        let records = (1..=15)
            .map(|id| record(id, TransactionKind::Deposit, id))
            .collect();
        let mut view = loaded(records);
        assert!(!view.prev_page());
        assert!(view.next_page());
        assert_eq!(view.page(), 2);
        assert!(!view.next_page());
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut view = TransactionListViewModel::default();
        let first = view.begin_load();
        let second = view.begin_load();

        let outcome = view
            .finish_load::<std::io::Error>(first, Ok(vec![record(1, TransactionKind::Deposit, 1)]))
            .unwrap();
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(view.loading());
        assert!(view.is_empty());

        let outcome = view
            .finish_load::<std::io::Error>(second, Ok(vec![record(2, TransactionKind::Withdraw, 1)]))
            .unwrap();
        assert_eq!(outcome, LoadOutcome::Applied(1));
        assert!(!view.loading());
        assert_eq!(view.records()[0].id, 2);
    }

    #[test]
    fn stale_failure_does_not_clear_loading() {
        let mut view = TransactionListViewModel::default();
        let first = view.begin_load();
        let _second = view.begin_load();
        let outcome = view.finish_load(first, Err(std::io::Error::other("boom")));
        assert_eq!(outcome, Ok(LoadOutcome::Stale));
        assert!(view.loading());
    }

    #[test]
    fn routes() {
        let view = TransactionListViewModel::default();
        let rec = record(42, TransactionKind::Transfer, 1);
        assert_eq!(view.view_details(&rec), Route::Detail { id: 42 });
        assert_eq!(view.view_details(&rec).path(), "transactions/42");
        assert_eq!(view.add_new().path(), "transactions/add");
    }

    #[test]
    fn record_lookup() {
        let view = loaded(vec![
            record(1, TransactionKind::Deposit, 1),
            record(2, TransactionKind::Withdraw, 2),
        ]);
        assert_eq!(view.record(2).map(|r| r.kind), Some(TransactionKind::Withdraw));
        assert!(view.record(3).is_none());
    }
}
