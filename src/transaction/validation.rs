//! Checks a new transaction before it is sent to the backend.

use serde::Deserialize;

use super::{Amount, CategoryCatalog, TransactionType};

/// A reason a new transaction was rejected before submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No category was chosen.
    #[error("Please select a category")]
    MissingCategory,

    /// The category ID is not one of the known categories.
    #[error("Category not found")]
    UnknownCategory(String),

    /// The amount was zero, negative or not a number.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    /// The amount was larger than [Amount::MAX].
    #[error("Amount is too large")]
    AmountTooLarge,

    /// The type was something other than income or expense.
    #[error("Type must be 'income' or 'expense'")]
    InvalidType(String),
}

/// The raw form data for a new transaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTransactionForm {
    /// The ID of the chosen category.
    #[serde(default)]
    pub category_id: Option<String>,
    /// The amount as typed by the user.
    #[serde(default)]
    pub amount: String,
    /// "income" or "expense".
    #[serde(rename = "type", default)]
    pub type_: String,
    /// Free text describing the transaction.
    #[serde(default)]
    pub note: String,
}

/// A transaction that passed validation and can be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// The ID of a category in the catalog.
    pub category_id: String,
    /// A strictly positive amount.
    pub amount: Amount,
    /// Whether this is income or an expense.
    pub type_: TransactionType,
    /// Free text describing the transaction.
    pub note: String,
}

impl NewTransaction {
    /// Validate `form` against `catalog`.
    ///
    /// The category is checked first, then the amount, then the type.
    pub fn validate(
        form: &NewTransactionForm,
        catalog: &CategoryCatalog,
    ) -> Result<Self, ValidationError> {
        let category_id = form
            .category_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::MissingCategory)?;

        let category = catalog
            .find(category_id)
            .ok_or_else(|| ValidationError::UnknownCategory(category_id.to_owned()))?;

        let value = form
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value > 0.0)
            .ok_or(ValidationError::NonPositiveAmount)?;

        let amount = Amount::from_decimal(value).ok_or(ValidationError::AmountTooLarge)?;

        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount);
        }

        let type_ = form.type_.trim().parse::<TransactionType>()?;

        Ok(Self {
            category_id: category.id.clone(),
            amount,
            type_,
            note: form.note.trim().to_owned(),
        })
    }
}
