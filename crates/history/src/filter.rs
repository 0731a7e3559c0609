//! Filters applied to the loaded record set.
//!
//! Both filters are closed enumerations: a value that is not listed here can
//! only come from parsing, and parsing rejects it.

use std::{fmt, str::FromStr};

use api_types::transaction::TransactionKind;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeDelta, TimeZone};

use crate::HistoryError;

/// Date window applied on `occurred_at`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DateRange {
    /// No date filter.
    #[default]
    All,
    /// Same calendar day as now, in the view timezone.
    Today,
    /// Rolling window: `occurred_at >= now - 7 days`.
    Last7Days,
    /// Rolling window: `occurred_at >= now - 30 days`.
    Last30Days,
    /// From the first day of the current month.
    ThisMonth,
    /// Every day of the previous calendar month.
    LastMonth,
}

impl DateRange {
    pub const ALL: [DateRange; 6] = [
        Self::All,
        Self::Today,
        Self::Last7Days,
        Self::Last30Days,
        Self::ThisMonth,
        Self::LastMonth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "none",
            Self::Today => "today",
            Self::Last7Days => "last7days",
            Self::Last30Days => "last30days",
            Self::ThisMonth => "thisMonth",
            Self::LastMonth => "lastMonth",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All time",
            Self::Today => "Today",
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
            Self::ThisMonth => "This month",
            Self::LastMonth => "Last month",
        }
    }

    /// Next value in declaration order, wrapping around.
    pub fn cycle(self) -> Self {
        let index = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Returns `true` if a record that occurred at `occurred_at` falls inside
    /// the window evaluated at `now`.
    ///
    /// Calendar-based windows compare dates in the timezone of `now`.
    pub fn contains<Tz: TimeZone>(
        self,
        occurred_at: &DateTime<FixedOffset>,
        now: &DateTime<Tz>,
    ) -> bool {
        let local_date = || occurred_at.with_timezone(&now.timezone()).date_naive();
        match self {
            Self::All => true,
            Self::Today => local_date() == now.date_naive(),
            Self::Last7Days => *occurred_at >= now.clone() - TimeDelta::days(7),
            Self::Last30Days => *occurred_at >= now.clone() - TimeDelta::days(30),
            Self::ThisMonth => local_date() >= first_of_month(now.date_naive()),
            Self::LastMonth => match previous_month(now.date_naive()) {
                Some((first, last)) => {
                    let date = local_date();
                    first <= date && date <= last
                }
                None => false,
            },
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "last7days" => Ok(Self::Last7Days),
            "last30days" => Ok(Self::Last30Days),
            "thisMonth" => Ok(Self::ThisMonth),
            "lastMonth" => Ok(Self::LastMonth),
            other => Err(HistoryError::UnknownDateRange(other.to_string())),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First and last day of the month before the one containing `date`.
fn previous_month(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let last = first_of_month(date).pred_opt()?;
    Some((first_of_month(last), last))
}

/// Parses a kind filter. The empty string means "no filter".
///
/// Accepts the short names (`deposit`, `withdraw`, `transfer`, any case) and
/// the backend wire values (`ACCOUNT_DEPOSIT`, ...).
pub fn parse_kind_filter(value: &str) -> Result<Option<TransactionKind>, HistoryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    TransactionKind::ALL
        .into_iter()
        .find(|kind| {
            trimmed.eq_ignore_ascii_case(kind_label(*kind)) || trimmed == kind.as_str()
        })
        .map(Some)
        .ok_or_else(|| HistoryError::UnknownKind(trimmed.to_string()))
}

/// Human label for a kind.
pub fn kind_label(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Deposit => "Deposit",
        TransactionKind::Withdraw => "Withdraw",
        TransactionKind::Transfer => "Transfer",
    }
}

/// Next kind filter: none, then every kind in declaration order.
pub fn cycle_kind_filter(current: Option<TransactionKind>) -> Option<TransactionKind> {
    match current {
        None => Some(TransactionKind::Deposit),
        Some(TransactionKind::Deposit) => Some(TransactionKind::Withdraw),
        Some(TransactionKind::Withdraw) => Some(TransactionKind::Transfer),
        Some(TransactionKind::Transfer) => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use chrono_tz::Europe::Rome;

    use super::*;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn parse_round_trips_every_range() {
        for range in DateRange::ALL {
            assert_eq!(range.as_str().parse::<DateRange>().unwrap(), range);
        }
        assert_eq!("".parse::<DateRange>().unwrap(), DateRange::All);
    }

    #[test]
    fn parse_rejects_unknown_range() {
        assert_eq!(
            "last7Days".parse::<DateRange>(),
            Err(HistoryError::UnknownDateRange("last7Days".to_string()))
        );
    }

    #[test]
    fn today_uses_view_timezone() {
        // 23:30 UTC on the 4th is already the 5th in Rome.
        let now = Rome.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        assert!(DateRange::Today.contains(&at("2024-03-04T23:30:00+00:00"), &now));
        assert!(!DateRange::Today.contains(&at("2024-03-04T22:30:00+00:00"), &now));
    }

    #[test]
    fn rolling_windows_are_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert!(DateRange::Last7Days.contains(&at("2024-03-03T12:00:00+00:00"), &now));
        assert!(!DateRange::Last7Days.contains(&at("2024-03-03T11:59:59+00:00"), &now));
        assert!(DateRange::Last30Days.contains(&at("2024-02-09T12:00:00+00:00"), &now));
        assert!(!DateRange::Last30Days.contains(&at("2024-02-09T11:59:59+00:00"), &now));
    }

    #[test]
    fn this_month_starts_on_the_first() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert!(DateRange::ThisMonth.contains(&at("2024-03-01T00:00:00+00:00"), &now));
        assert!(!DateRange::ThisMonth.contains(&at("2024-02-29T23:59:59+00:00"), &now));
    }

    #[test]
    fn last_month_covers_whole_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert!(DateRange::LastMonth.contains(&at("2024-02-01T00:00:00+00:00"), &now));
        assert!(DateRange::LastMonth.contains(&at("2024-02-29T18:00:00+00:00"), &now));
        assert!(!DateRange::LastMonth.contains(&at("2024-01-31T23:59:59+00:00"), &now));
        assert!(!DateRange::LastMonth.contains(&at("2024-03-01T00:00:00+00:00"), &now));
    }

    #[test]
    fn last_month_wraps_year() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap();
        assert!(DateRange::LastMonth.contains(&at("2024-12-31T10:00:00+00:00"), &now));
        assert!(!DateRange::LastMonth.contains(&at("2024-11-30T10:00:00+00:00"), &now));
    }

    #[test]
    fn kind_filter_parsing() {
        assert_eq!(parse_kind_filter("").unwrap(), None);
        assert_eq!(parse_kind_filter("deposit").unwrap(), Some(TransactionKind::Deposit));
        assert_eq!(
            parse_kind_filter("ACCOUNT_TRANSFER").unwrap(),
            Some(TransactionKind::Transfer)
        );
        assert!(parse_kind_filter("loan").is_err());
    }

    #[test]
    fn cycles_wrap_around() {
        assert_eq!(DateRange::LastMonth.cycle(), DateRange::All);
        assert_eq!(cycle_kind_filter(Some(TransactionKind::Transfer)), None);
    }
}
