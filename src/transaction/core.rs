//! Domain types for transactions and the categories they are filed under.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ValidationError;

/// The label used for transactions that do not have a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// An amount of money held as a whole number of cents.
///
/// Totals are computed on cents, so per-category totals always add up to
/// the overall total exactly. Arithmetic saturates at the bounds of `i64`
/// instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// No money at all.
    pub const ZERO: Amount = Amount(0);

    /// The largest amount accepted from users or the backend, one trillion
    /// currency units.
    pub const MAX: Amount = Amount(100_000_000_000_000);

    /// Create an amount from a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create an amount from a decimal number of currency units, rounding to
    /// the nearest cent.
    ///
    /// Returns `None` if `value` is not finite or its magnitude exceeds
    /// [Amount::MAX].
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }

        let cents = (value * 100.0).round();

        if cents.abs() > Self::MAX.0 as f64 {
            return None;
        }

        Some(Self(cents as i64))
    }

    /// The amount in cents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// The amount in currency units, for display and charting.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whether the amount is strictly greater than zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Scale the amount by `ratio`, rounding to the nearest cent.
    pub fn scale(self, ratio: f64) -> Self {
        // `as` saturates on overflow.
        Self((self.0 as f64 * ratio).round() as i64)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

/// Formats the amount with exactly two decimal places, e.g. "1234.50".
impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();

        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The value used by the backend and in HTML forms.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The human readable name.
    pub const fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(ValidationError::InvalidType(other.to_owned())),
        }
    }
}

/// A transaction recorded by the backend.
///
/// Transactions are read-only on this side: they are created by the backend
/// and only ever listed and summarised here.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The backend's identifier for the transaction.
    pub id: String,
    /// How much money moved. Always zero or more, the direction is given by `type_`.
    pub amount: Amount,
    /// Whether this is income or an expense.
    pub type_: TransactionType,
    /// Free text entered by the user.
    pub note: String,
    /// The name of the category, if the transaction has one.
    pub category: Option<String>,
    /// When the backend recorded the transaction.
    pub created_at: Option<OffsetDateTime>,
}

impl Transaction {
    /// The category name, or [UNCATEGORIZED_LABEL] if there is none.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED_LABEL)
    }
}

/// A category that new transactions can be filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// The backend's identifier for the category.
    pub id: String,
    /// The display name.
    pub name: String,
}

impl Category {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
        }
    }
}

/// The categories offered when creating a transaction.
///
/// The default catalog holds the five categories the backend ships with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Create a catalog from a list of categories.
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// All categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Find the category with the ID `id`.
    pub fn find(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::new(vec![
            Category::new("72ef8cf9-d24a-4e65-8327-9fe804d4642e", "Food"),
            Category::new("d7e0f59e-de4a-43eb-bb7f-84db31e75936", "Transport"),
            Category::new("e476fe13-4e40-4bfb-84a6-41efc13fd94b", "Entertainment"),
            Category::new("deada599-3a96-4f1f-941d-cd74745956f7", "Utilities"),
            Category::new("84b59c54-8dfc-4e81-b933-8d7c38ee2fef", "Other"),
        ])
    }
}
