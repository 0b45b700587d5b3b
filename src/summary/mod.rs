//! Summary module
//!
//! Provides a page with income and expense totals and charts for a month or
//! date range chosen by the user.

mod cards;
mod charts;
mod filter_form;
mod handlers;

pub use handlers::get_summary_page;
