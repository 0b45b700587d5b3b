//! Defines the endpoint for recording a new transaction.

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// axum_extra's Form accepts repeated and empty fields. An empty category
// arrives as `Some("")` and is rejected by validation.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error,
    api::{ApiClient, Session},
    endpoints,
};

use super::{CategoryCatalog, NewTransaction, NewTransactionForm};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The client used to send the transaction to the backend.
    pub api_client: ApiClient,
    /// The categories a transaction can be filed under.
    pub categories: CategoryCatalog,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
            categories: state.categories.clone(),
        }
    }
}

/// A route handler for recording a new transaction, redirects to the activity view on success.
///
/// The form is validated before anything is sent to the backend. Validation
/// and backend errors are returned as an alert.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(session): Extension<Session>,
    Form(form): Form<NewTransactionForm>,
) -> Response {
    let new_transaction = match NewTransaction::validate(&form, &state.categories) {
        Ok(new_transaction) => new_transaction,
        Err(error) => {
            tracing::debug!("Rejected new transaction: {error}");
            return Error::from(error).into_alert_response();
        }
    };

    match state
        .api_client
        .add_transaction(&session, &new_transaction)
        .await
    {
        Ok(transaction) => {
            tracing::info!("Recorded transaction {}", transaction.id);

            (
                HxRedirect(endpoints::ACTIVITY_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => Error::from(error).into_alert_response(),
    }
}
