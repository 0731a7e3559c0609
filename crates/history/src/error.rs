//! The module contains the errors the history crate can return.
//!
//! The errors are:
//!
//! - [`Fetch`] returned when the [`TransactionSource`] failed. Non-fatal: the
//!   view keeps its previous records and a new load can be triggered.
//! - [`UnknownDateRange`], [`UnknownSortField`] and [`UnknownKind`] returned
//!   when parsing user or config input into the closed filter enums.
//! - [`InvalidAmount`], [`InvalidAccount`] and [`SameAccount`] returned by the
//!   new-transaction form.
//!
//!  [`Fetch`]: HistoryError::Fetch
//!  [`UnknownDateRange`]: HistoryError::UnknownDateRange
//!  [`UnknownSortField`]: HistoryError::UnknownSortField
//!  [`UnknownKind`]: HistoryError::UnknownKind
//!  [`InvalidAmount`]: HistoryError::InvalidAmount
//!  [`InvalidAccount`]: HistoryError::InvalidAccount
//!  [`SameAccount`]: HistoryError::SameAccount
//!  [`TransactionSource`]: super::source::TransactionSource
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// History custom errors.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("failed to fetch transactions: {0}")]
    Fetch(#[source] BoxedSource),
    #[error("unknown date range: \"{0}\"")]
    UnknownDateRange(String),
    #[error("unknown sort field: \"{0}\"")]
    UnknownSortField(String),
    #[error("unknown transaction kind: \"{0}\"")]
    UnknownKind(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid account: {0}")]
    InvalidAccount(String),
    #[error("source and target account must differ")]
    SameAccount,
}

impl HistoryError {
    pub(crate) fn fetch<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Fetch(Box::new(err))
    }
}

impl PartialEq for HistoryError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fetch(a), Self::Fetch(b)) => a.to_string() == b.to_string(),
            (Self::UnknownDateRange(a), Self::UnknownDateRange(b)) => a == b,
            (Self::UnknownSortField(a), Self::UnknownSortField(b)) => a == b,
            (Self::UnknownKind(a), Self::UnknownKind(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidAccount(a), Self::InvalidAccount(b)) => a == b,
            (Self::SameAccount, Self::SameAccount) => true,
            _ => false,
        }
    }
}
