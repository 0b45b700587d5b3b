//! The JSON payloads exchanged with the backend.
//!
//! Responses are deserialised into loosely typed wire structs first and then
//! converted into domain types, so a payload with missing or nonsensical
//! fields becomes an [ApiError::MalformedResponse] instead of reaching the views.

use serde::{Deserialize, Serialize};
use time::{
    OffsetDateTime, PrimitiveDateTime,
    format_description::well_known::{Iso8601, Rfc3339},
};

use crate::transaction::{Amount, NewTransaction, Transaction, TransactionType};

use super::ApiError;

/// The response to `POST /login`.
#[derive(Debug, Deserialize)]
pub(super) struct LogInResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// An ID the backend may send either as a string or as a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum WireId {
    Text(String),
    Number(i64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        }
    }
}

/// An amount the backend may send either as a JSON number or as a decimal string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum WireAmount {
    Number(f64),
    Text(String),
}

impl WireAmount {
    fn parse(&self) -> Option<Amount> {
        let value = match self {
            WireAmount::Number(number) => *number,
            WireAmount::Text(text) => text.trim().parse().ok()?,
        };

        Amount::from_decimal(value)
    }
}

/// The response to `GET /profile`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProfileResponse {
    id: WireId,
    email: String,
    #[serde(default, alias = "created_at")]
    created_at: Option<String>,
}

/// The logged-in user's account details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// The backend's identifier for the user.
    pub id: String,
    /// The user's email address.
    pub email: String,
    /// When the account was created, if the backend reported a readable time.
    pub created_at: Option<OffsetDateTime>,
}

impl From<ProfileResponse> for Profile {
    fn from(response: ProfileResponse) -> Self {
        Self {
            id: response.id.into(),
            email: response.email,
            created_at: response.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// A transaction as listed by `GET /transactions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TransactionResponse {
    id: WireId,
    amount: WireAmount,
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    note: Option<String>,
    #[serde(default, alias = "created_at")]
    created_at: Option<String>,
    #[serde(default, alias = "category_name")]
    category_name: Option<String>,
}

impl TryFrom<TransactionResponse> for Transaction {
    type Error = ApiError;

    fn try_from(response: TransactionResponse) -> Result<Self, Self::Error> {
        let id = String::from(response.id);

        let amount = response
            .amount
            .parse()
            .filter(|amount| amount.cents() >= 0)
            .ok_or_else(|| {
                ApiError::MalformedResponse(format!(
                    "transaction {id} has an invalid amount {:?}",
                    response.amount
                ))
            })?;

        let type_ = response.type_.parse::<TransactionType>().map_err(|_| {
            ApiError::MalformedResponse(format!(
                "transaction {id} has an invalid type {:?}",
                response.type_
            ))
        })?;

        let created_at = match response.created_at.as_deref() {
            None => None,
            Some(raw) => {
                let parsed = parse_timestamp(raw);
                if parsed.is_none() {
                    tracing::warn!("Transaction {id} has an unreadable timestamp {raw:?}");
                }
                parsed
            }
        };

        let category = response
            .category_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());

        Ok(Transaction {
            id,
            amount,
            type_,
            note: response.note.unwrap_or_default(),
            category,
            created_at,
        })
    }
}

/// Convert a list of transactions, failing on the first malformed entry.
pub(super) fn parse_transactions(
    responses: Vec<TransactionResponse>,
) -> Result<Vec<Transaction>, ApiError> {
    responses.into_iter().map(Transaction::try_from).collect()
}

/// The response to `POST /add-transaction`.
#[derive(Debug, Deserialize)]
pub(super) struct AddTransactionResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub transaction: TransactionResponse,
}

/// The body of `POST /add-transaction`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AddTransactionRequest<'a> {
    category_id: &'a str,
    amount: f64,
    #[serde(rename = "type")]
    type_: TransactionType,
    note: &'a str,
}

impl<'a> From<&'a NewTransaction> for AddTransactionRequest<'a> {
    fn from(transaction: &'a NewTransaction) -> Self {
        Self {
            category_id: &transaction.category_id,
            amount: transaction.amount.as_f64(),
            type_: transaction.type_,
            note: &transaction.note,
        }
    }
}

/// Parse an RFC 3339 timestamp, or an ISO 8601 timestamp without an offset
/// which is taken to be UTC.
fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(|dt| dt.assume_utc()))
        .ok()
}
