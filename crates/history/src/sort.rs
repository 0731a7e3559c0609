use std::{cmp::Ordering, fmt, str::FromStr};

use api_types::transaction::TransactionRecord;

use crate::HistoryError;

/// Column the filtered set is ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    OccurredAt,
    Amount,
    Kind,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OccurredAt => "occurredAt",
            Self::Amount => "amount",
            Self::Kind => "kind",
        }
    }

    /// Ascending comparison of two records on this field.
    ///
    /// Kinds compare by declaration order, not by name.
    pub fn compare(self, a: &TransactionRecord, b: &TransactionRecord) -> Ordering {
        match self {
            Self::OccurredAt => a.occurred_at.cmp(&b.occurred_at),
            Self::Amount => a.amount_minor.cmp(&b.amount_minor),
            Self::Kind => a.kind.cmp(&b.kind),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "occurredAt" => Ok(Self::OccurredAt),
            "amount" => Ok(Self::Amount),
            "kind" => Ok(Self::Kind),
            other => Err(HistoryError::UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Applies the direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}
