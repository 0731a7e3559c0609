//! Transaction history for one customer: the list view-model the terminal
//! shell renders, its filters and sort keys, and the new-transaction form.

pub use api_types::transaction::{TransactionKind, TransactionRecord};
pub use entry::EntryDraft;
pub use error::HistoryError;
pub use filter::{DateRange, cycle_kind_filter, kind_label, parse_kind_filter};
pub use money::MoneyCents;
pub use sort::{SortDirection, SortField};
pub use source::TransactionSource;
pub use view_model::{DEFAULT_PAGE_SIZE, LoadOutcome, LoadTicket, Route, TransactionListViewModel};

pub mod entry;
mod error;
mod filter;
mod money;
mod sort;
mod source;
mod view_model;

pub type ResultHistory<T> = Result<T, HistoryError>;
