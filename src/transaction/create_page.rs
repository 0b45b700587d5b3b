//! Defines the route handler for the page for recording a new transaction.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState,
    api::Session,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        loading_spinner,
    },
    navigation::NavBar,
};

use super::{CategoryCatalog, TransactionType};

fn create_transaction_view(user_email: &str, catalog: &CategoryCatalog) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW, user_email).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Add record" }

                div
                {
                    label
                        for="amount"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Amount"
                    }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="type"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Type"
                    }

                    select
                        name="type"
                        id="type"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for type_ in [TransactionType::Income, TransactionType::Expense] {
                            option
                                value=(type_.as_str())
                                selected[type_ == TransactionType::Income]
                            {
                                (type_.label())
                            }
                        }
                    }
                }

                div
                {
                    label
                        for="note"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Note"
                    }

                    input
                        name="note"
                        id="note"
                        type="text"
                        placeholder="What was it for?"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="category_id"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Category"
                    }

                    select
                        name="category_id"
                        id="category_id"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" disabled selected { "Select a category" }

                        @for category in catalog.categories() {
                            option value=(category.id) { (category.name) }
                        }
                    }
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Add record"
                }
            }
        }
    };

    base("Add record", &[], &content)
}

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    /// The categories a transaction can be filed under.
    pub categories: CategoryCatalog,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            categories: state.categories.clone(),
        }
    }
}

/// Renders the page for recording a transaction.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
    Extension(session): Extension<Session>,
) -> Response {
    create_transaction_view(session.email(), &state.categories).into_response()
}
