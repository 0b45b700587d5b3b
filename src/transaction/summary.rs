//! Totals derived from a list of transactions.

use std::collections::HashMap;

use super::{Amount, Transaction, TransactionType};

/// The share of income that should be put aside as savings.
pub const RECOMMENDED_SAVINGS_RATIO: f64 = 0.2;

/// Income, expense and per-category expense totals for a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionSummary {
    /// The sum of all income.
    pub total_income: Amount,
    /// The sum of all expenses.
    pub total_expense: Amount,
    /// Expenses summed per category name, in the order each category first appears.
    pub category_totals: Vec<(String, Amount)>,
}

impl TransactionSummary {
    /// Summarise `transactions`.
    ///
    /// An empty slice gives zero totals and no categories.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut summary = Self::default();
        let mut category_index: HashMap<&str, usize> = HashMap::new();

        for transaction in transactions {
            match transaction.type_ {
                TransactionType::Income => summary.total_income += transaction.amount,
                TransactionType::Expense => {
                    summary.total_expense += transaction.amount;

                    let category = transaction.category_label();
                    match category_index.get(category) {
                        Some(&index) => summary.category_totals[index].1 += transaction.amount,
                        None => {
                            category_index.insert(category, summary.category_totals.len());
                            summary
                                .category_totals
                                .push((category.to_owned(), transaction.amount));
                        }
                    }
                }
            }
        }

        summary
    }

    /// Income minus expenses.
    pub fn balance(&self) -> Amount {
        self.total_income - self.total_expense
    }

    /// How much of the income should be saved.
    pub fn recommended_savings(&self) -> Amount {
        self.total_income.scale(RECOMMENDED_SAVINGS_RATIO)
    }
}
