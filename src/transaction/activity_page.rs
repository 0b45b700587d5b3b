//! Defines the route handler for the page that lists every transaction as a table.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    alert::Alert,
    api::{ApiClient, Session},
    endpoints,
    html::{
        CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    timezone::get_local_offset,
};

use super::{Transaction, TransactionType};

/// The max number of graphemes to display in the note column before
/// truncating and displaying ellipses.
const MAX_NOTE_GRAPHEMES: usize = 32;

const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

pub const FETCH_ERROR_MSG: &str = "Failed to fetch transactions.";

/// The state needed for the activity page.
#[derive(Debug, Clone)]
pub struct ActivityPageState {
    /// The client used to fetch the user's transactions.
    pub api_client: ApiClient,
    /// The reference timezone as a canonical timezone name, e.g. "Asia/Bangkok".
    pub local_timezone: String,
}

impl FromRef<AppState> for ActivityPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn amount_class(type_: TransactionType) -> &'static str {
    match type_ {
        TransactionType::Income => "text-green-700 dark:text-green-300",
        TransactionType::Expense => "text-red-700 dark:text-red-300",
    }
}

fn format_note(note: &str) -> (String, Option<&str>) {
    let note_length = note.graphemes(true).count();

    if note_length <= MAX_NOTE_GRAPHEMES {
        (note.to_owned(), None)
    } else {
        let truncated: String = note.graphemes(true).take(MAX_NOTE_GRAPHEMES - 3).collect();
        (truncated + "...", Some(note))
    }
}

fn format_created_at(created_at: Option<OffsetDateTime>, offset: UtcOffset) -> String {
    created_at
        .and_then(|created_at| created_at.checked_to_offset(offset))
        .and_then(|local| local.format(DATE_TIME_FORMAT).ok())
        .unwrap_or_else(|| "-".to_owned())
}

fn transaction_row_view(transaction: &Transaction, offset: UtcOffset) -> Markup {
    let (note, tooltip) = format_note(&transaction.note);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class={ (TABLE_CELL_STYLE) " whitespace-nowrap" } data-column="date"
            {
                (format_created_at(transaction.created_at, offset))
            }
            td class=(TABLE_CELL_STYLE) title=[tooltip] data-column="note" { (note) }
            td
                class={ "px-6 py-4 text-right " (amount_class(transaction.type_)) }
                data-column="amount"
            {
                (format_currency(transaction.amount))
            }
            td class=(TABLE_CELL_STYLE) data-column="type" { (transaction.type_.label()) }
            td class=(TABLE_CELL_STYLE) data-column="category"
            {
                @if let Some(ref category) = transaction.category {
                    span class=(CATEGORY_BADGE_STYLE) { (category) }
                } @else {
                    span class="text-gray-400 dark:text-gray-500" { "-" }
                }
            }
        }
    }
}

fn transactions_table(transactions: &[Transaction], offset: UtcOffset) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded shadow"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row_view(transaction, offset))
                    }

                    @if transactions.is_empty() {
                        tr
                        {
                            td colspan="5" data-empty-state="true" class="px-6 py-4 text-center"
                            {
                                "No transactions yet. "
                                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                                {
                                    "Add your first record"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn activity_view(user_email: &str, body: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACTIVITY_VIEW, user_email).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-4"
            {
                div class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Activity" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add record"
                    }
                }

                (body)
            }
        }
    };

    base("Activity", &[], &content)
}

/// Renders every transaction of the logged in user, newest data straight from the backend.
///
/// A failed fetch is shown as an error message in place of the table. A
/// rejected session token is returned as [Error::SessionExpired] so the auth
/// guard can log the user out.
pub async fn get_activity_page(
    State(state): State<ActivityPageState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let body = match state.api_client.transactions(&session).await {
        Ok(transactions) => transactions_table(&transactions, local_offset),
        Err(error) if error.is_unauthorized() => return Err(Error::SessionExpired),
        Err(error) => {
            tracing::error!("Could not fetch transactions: {error}");
            Alert::Error {
                message: FETCH_ERROR_MSG.to_owned(),
                details: error.user_message(),
            }
            .into_html()
        }
    };

    Ok(activity_view(session.email(), body).into_response())
}
