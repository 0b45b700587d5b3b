//! Transactions for the budgeting application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, money amounts and the category catalog
//! - Filtering by month or date range and summarising totals
//! - Validation of new transactions before they are sent to the backend
//! - View handlers for the activity page and the new transaction form

mod activity_page;
mod core;
mod create_endpoint;
mod create_page;
mod filter;
mod summary;
mod validation;

pub use activity_page::get_activity_page;
pub use core::{Amount, CategoryCatalog, Transaction, TransactionType};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use filter::{DATE_RANGE_MODE, FilterQuery, MONTH_MODE, filter_transactions};
pub use summary::TransactionSummary;
pub use validation::{NewTransaction, NewTransactionForm, ValidationError};
