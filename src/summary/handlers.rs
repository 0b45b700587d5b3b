//! Summary HTTP handler and view rendering.

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    alert::Alert,
    api::{ApiClient, Session},
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    summary::{
        cards::summary_cards_view,
        charts::{ECHARTS_SCRIPT, build_summary_charts, charts_script, charts_view},
        filter_form::filter_form_view,
    },
    timezone::get_local_offset,
    transaction::{FilterQuery, TransactionSummary, filter_transactions},
};

pub const FETCH_ERROR_MSG: &str = "Failed to load the summary.";

/// The state needed for displaying the summary page.
#[derive(Debug, Clone)]
pub struct SummaryPageState {
    /// The client used to fetch the user's transactions.
    pub api_client: ApiClient,
    /// The reference timezone as a canonical timezone name, e.g. "Asia/Bangkok".
    pub local_timezone: String,
}

impl FromRef<AppState> for SummaryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn transaction_count_view(shown: usize, total: usize) -> Markup {
    html! {
        p id="transaction-count" class="text-sm text-gray-600 dark:text-gray-400"
        {
            "Showing " (shown) " of " (total) " transactions"
        }
    }
}

fn summary_view(user_email: &str, body: Markup, head_elements: &[HeadElement]) -> Markup {
    let nav_bar = NavBar::new(endpoints::SUMMARY_VIEW, user_email).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl space-y-4"
            {
                h1 class="text-xl font-bold" { "Summary" }

                (body)
            }
        }
    };

    base("Summary", head_elements, &content)
}

/// Display totals and charts for the transactions in the time window chosen
/// in the query string.
///
/// A malformed filter value shows a warning and falls back to every
/// transaction. A failed fetch is shown as an error message in place of the
/// totals.
pub async fn get_summary_page(
    State(state): State<SummaryPageState>,
    Extension(session): Extension<Session>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let (filter, warning) = query.resolve(today);
    if let Some(ref warning) = warning {
        tracing::debug!("Ignoring summary filter: {warning}");
    }

    let filter_form = filter_form_view(&query, today);

    let transactions = match state.api_client.transactions(&session).await {
        Ok(transactions) => transactions,
        Err(error) if error.is_unauthorized() => return Err(Error::SessionExpired),
        Err(error) => {
            tracing::error!("Could not fetch transactions for the summary: {error}");
            let alert = Alert::Error {
                message: FETCH_ERROR_MSG.to_owned(),
                details: error.user_message(),
            }
            .into_html();
            let body = html! {
                (filter_form)
                (alert)
            };

            return Ok(summary_view(session.email(), body, &[]).into_response());
        }
    };

    let filtered = filter_transactions(&transactions, &filter, local_offset);
    let summary = TransactionSummary::from_transactions(&filtered);
    let charts = build_summary_charts(&summary);

    let body = html! {
        (filter_form)

        @if let Some(warning) = warning {
            div id="filter-warning"
            {
                (Alert::ErrorSimple { message: warning.to_string() }.into_html())
            }
        }

        (transaction_count_view(filtered.len(), transactions.len()))
        (summary_cards_view(&summary))
        (charts_view(&charts))
    };

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&charts),
    ];

    Ok(summary_view(session.email(), body, &scripts).into_response())
}
