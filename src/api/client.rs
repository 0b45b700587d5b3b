//! The HTTP client that talks to the backend.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::transaction::{NewTransaction, Transaction};

use super::{
    ApiError, Credentials, Profile, Session,
    models::{
        AddTransactionRequest, AddTransactionResponse, LogInResponse, ProfileResponse,
        TransactionResponse, parse_transactions,
    },
};

/// The hosted backend used when no other URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://budget-tracker-backend-aevg.onrender.com";

/// A client for the budget tracker backend.
///
/// Cloning is cheap, clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// Every request is abandoned after `timeout`.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The URL of the backend, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange `credentials` for a session.
    ///
    /// # Errors
    /// Returns [ApiError::Status] with a 401 status if the credentials were
    /// rejected, or [ApiError::MissingToken] if the backend accepted them but
    /// did not issue a token.
    pub async fn log_in(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = self.http.post(self.url("/login")).json(credentials);
        let response: LogInResponse = send_json(request, "log in").await?;

        let token = response
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or(ApiError::MissingToken)?;

        Ok(Session::new(token, credentials.email.clone()))
    }

    /// Create an account. The new user still has to log in afterwards.
    pub async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let request = self.http.post(self.url("/register")).json(credentials);

        send(request, "register").await.map(|_| ())
    }

    /// End `session` on the backend.
    pub async fn log_out(&self, session: &Session) -> Result<(), ApiError> {
        let request = self
            .http
            .post(self.url("/logout"))
            .bearer_auth(session.token());

        send(request, "log out").await.map(|_| ())
    }

    /// Get the account details of the logged-in user.
    pub async fn profile(&self, session: &Session) -> Result<Profile, ApiError> {
        let request = self
            .http
            .get(self.url("/profile"))
            .bearer_auth(session.token());
        let response: ProfileResponse = send_json(request, "get profile").await?;

        Ok(response.into())
    }

    /// Get every transaction belonging to the logged-in user.
    ///
    /// # Errors
    /// Returns [ApiError::MalformedResponse] if any transaction does not have
    /// a valid amount and type.
    pub async fn transactions(&self, session: &Session) -> Result<Vec<Transaction>, ApiError> {
        let request = self
            .http
            .get(self.url("/transactions"))
            .bearer_auth(session.token());
        let response: Vec<TransactionResponse> = send_json(request, "get transactions").await?;

        parse_transactions(response).inspect_err(|error| {
            tracing::error!("Discarding transaction list from backend: {error}");
        })
    }

    /// Record a new transaction and return it as stored by the backend.
    pub async fn add_transaction(
        &self,
        session: &Session,
        transaction: &NewTransaction,
    ) -> Result<Transaction, ApiError> {
        let request = self
            .http
            .post(self.url("/add-transaction"))
            .bearer_auth(session.token())
            .json(&AddTransactionRequest::from(transaction));
        let response: AddTransactionResponse = send_json(request, "add transaction").await?;

        if let Some(message) = response.message.as_deref() {
            tracing::debug!("Backend added transaction: {message}");
        }

        response.transaction.try_into()
    }
}

/// Send `request` and check that the backend answered with a 2xx status.
async fn send(request: RequestBuilder, action: &str) -> Result<Response, ApiError> {
    let response = request.send().await.inspect_err(|error| {
        tracing::error!("Could not {action}, the backend is unreachable: {error}");
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = ApiError::Status { status, body };

    if error.is_unauthorized() {
        tracing::debug!("Backend rejected {action} request with {status}");
    } else {
        tracing::warn!("Could not {action}: {error}");
    }

    Err(error)
}

/// Send `request` and parse the JSON body of a 2xx response.
async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    action: &str,
) -> Result<T, ApiError> {
    let body = send(request, action).await?.text().await?;

    serde_json::from_str(&body).map_err(|error| {
        tracing::error!("Could not parse backend response to {action}: {error}");
        ApiError::MalformedResponse(error.to_string())
    })
}
