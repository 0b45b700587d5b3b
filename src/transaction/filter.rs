//! Selects the transactions that fall inside a time window.
//!
//! All calendar calculations are done in a single reference UTC offset, the
//! same one used to display dates, so that a transaction is never shown on one
//! day and filtered as if it happened on another.

use serde::{Deserialize, Serialize};
use time::{
    Date, Month, UtcOffset, format_description::BorrowedFormatItem, macros::format_description,
};

use super::Transaction;

/// The format of dates submitted by `<input type="date">`.
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The value of the `mode` query parameter that selects a date range.
pub const DATE_RANGE_MODE: &str = "date_range";
/// The value of the `mode` query parameter that selects a calendar month.
pub const MONTH_MODE: &str = "month";

/// A validated time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionFilter {
    /// Keep every transaction.
    All,
    /// Keep transactions created in `month` of `year`.
    Month {
        /// The calendar month.
        month: Month,
        /// The calendar year.
        year: i32,
    },
    /// Keep transactions created from the start of `start` up to the end of `end`.
    DateRange {
        /// The first day to include.
        start: Date,
        /// The last day to include, in full.
        end: Date,
    },
}

impl TransactionFilter {
    /// Whether `transaction` falls inside the window, evaluated in `offset`.
    ///
    /// Transactions without a creation time only match [TransactionFilter::All].
    pub fn matches(&self, transaction: &Transaction, offset: UtcOffset) -> bool {
        match *self {
            TransactionFilter::All => true,
            TransactionFilter::Month { month, year } => transaction
                .created_at
                .and_then(|created_at| created_at.checked_to_offset(offset))
                .is_some_and(|local| local.month() == month && local.year() == year),
            TransactionFilter::DateRange { start, end } => {
                let Some(created_at) = transaction.created_at else {
                    return false;
                };
                let lower = start.midnight().assume_offset(offset);

                match end.next_day() {
                    Some(day_after_end) => {
                        let upper = day_after_end.midnight().assume_offset(offset);
                        lower <= created_at && created_at < upper
                    }
                    None => lower <= created_at,
                }
            }
        }
    }
}

/// A filter value that could not be understood.
///
/// The filter falls back to showing every transaction and the page shows the
/// warning instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterWarning {
    /// The month was not a number from 1 to 12.
    #[error("\"{0}\" is not a valid month, showing all transactions instead")]
    InvalidMonth(String),
    /// The year was not a whole number.
    #[error("\"{0}\" is not a valid year, showing all transactions instead")]
    InvalidYear(String),
    /// The start of the date range was not a valid date.
    #[error("\"{0}\" is not a valid start date, showing all transactions instead")]
    InvalidStartDate(String),
    /// The end of the date range was not a valid date.
    #[error("\"{0}\" is not a valid end date, showing all transactions instead")]
    InvalidEndDate(String),
}

/// The raw filter selection from the summary page's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    /// Either [MONTH_MODE] or [DATE_RANGE_MODE]. Anything else means month mode.
    pub mode: Option<String>,
    /// The month number, 1 to 12.
    pub month: Option<String>,
    /// The year for month mode. Defaults to the current year.
    pub year: Option<String>,
    /// The first day of the date range, "YYYY-MM-DD".
    pub start: Option<String>,
    /// The last day of the date range, "YYYY-MM-DD".
    pub end: Option<String>,
}

impl FilterQuery {
    /// Whether the query selects date range mode.
    pub fn is_date_range_mode(&self) -> bool {
        non_empty(&self.mode) == Some(DATE_RANGE_MODE)
    }

    /// Turn the raw selection into a filter.
    ///
    /// A selection that is incomplete (e.g. no month chosen, or only one end of
    /// a date range) is treated as no filter. A selection with a malformed
    /// value also falls back to no filter, but comes with a warning.
    /// `today` supplies the default year.
    pub fn resolve(&self, today: Date) -> (TransactionFilter, Option<FilterWarning>) {
        if self.is_date_range_mode() {
            self.resolve_date_range()
        } else {
            self.resolve_month(today)
        }
    }

    fn resolve_date_range(&self) -> (TransactionFilter, Option<FilterWarning>) {
        let (Some(start), Some(end)) = (non_empty(&self.start), non_empty(&self.end)) else {
            return (TransactionFilter::All, None);
        };

        let Ok(start) = Date::parse(start, DATE_FORMAT) else {
            return (
                TransactionFilter::All,
                Some(FilterWarning::InvalidStartDate(start.to_owned())),
            );
        };

        let Ok(end) = Date::parse(end, DATE_FORMAT) else {
            return (
                TransactionFilter::All,
                Some(FilterWarning::InvalidEndDate(end.to_owned())),
            );
        };

        (TransactionFilter::DateRange { start, end }, None)
    }

    fn resolve_month(&self, today: Date) -> (TransactionFilter, Option<FilterWarning>) {
        let Some(raw_month) = non_empty(&self.month) else {
            return (TransactionFilter::All, None);
        };

        let Some(month) = raw_month
            .parse::<u8>()
            .ok()
            .and_then(|number| Month::try_from(number).ok())
        else {
            return (
                TransactionFilter::All,
                Some(FilterWarning::InvalidMonth(raw_month.to_owned())),
            );
        };

        let year = match non_empty(&self.year) {
            None => today.year(),
            Some(raw_year) => match raw_year.parse::<i32>() {
                Ok(year) => year,
                Err(_) => {
                    return (
                        TransactionFilter::All,
                        Some(FilterWarning::InvalidYear(raw_year.to_owned())),
                    );
                }
            },
        };

        (TransactionFilter::Month { month, year }, None)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// The transactions in `transactions` that match `filter`, in their original order.
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: &TransactionFilter,
    offset: UtcOffset,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| filter.matches(transaction, offset))
        .cloned()
        .collect()
}
