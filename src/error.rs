//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, api::ApiError, auth::SessionRejected,
    internal_server_error::InternalServerError, transaction::ValidationError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend no longer accepts the session token.
    ///
    /// The auth middleware turns this into a redirect to the log-in page and
    /// clears the session cookie.
    #[error("the session was rejected by the backend")]
    SessionExpired,

    /// A call to the backend failed for a reason other than an expired session.
    #[error(transparent)]
    Api(ApiError),

    /// A new transaction did not pass validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The session cookie could not be created.
    #[error("could not create the session cookie: {0}")]
    CookieError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Self {
        if error.is_unauthorized() {
            Error::SessionExpired
        } else {
            Error::Api(error)
        }
    }
}

fn invalid_timezone_fix(timezone: &str) -> String {
    format!(
        "Could not get local timezone \"{timezone}\". Check your server settings and \
        ensure the timezone has been set to valid, canonical timezone string"
    )
}

/// A bare 401 response tagged so that the auth middleware can log the user out.
fn session_rejected_response() -> Response {
    let mut response = StatusCode::UNAUTHORIZED.into_response();
    response.extensions_mut().insert(SessionRejected);
    response
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::SessionExpired => session_rejected_response(),
            Error::Api(error) => {
                tracing::error!("Backend request failed: {error}");
                InternalServerError {
                    description: "Could not load data from the server.",
                    fix: &error.user_message(),
                }
                .into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &invalid_timezone_fix(&timezone),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::SessionExpired => return session_rejected_response(),
            Error::Validation(error) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction".to_owned(),
                    details: error.to_string(),
                },
            ),
            Error::Api(error) => {
                tracing::error!("Backend request failed: {error}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: "The server could not complete the request".to_owned(),
                        details: error.user_message(),
                    },
                )
            }
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: invalid_timezone_fix(&timezone),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use reqwest::StatusCode as BackendStatus;

    use crate::{
        api::ApiError,
        test_utils::{assert_session_rejected, parse_html_fragment, select_text},
        transaction::ValidationError,
    };

    use super::Error;

    #[test]
    fn unauthorized_backend_error_is_session_expired() {
        let error = Error::from(ApiError::Status {
            status: BackendStatus::UNAUTHORIZED,
            body: String::new(),
        });

        assert!(matches!(error, Error::SessionExpired), "got {error:?}");
    }

    #[test]
    fn other_backend_errors_are_kept() {
        let error = Error::from(ApiError::MissingToken);

        assert!(matches!(error, Error::Api(_)), "got {error:?}");
    }

    #[test]
    fn session_expired_response_is_marked() {
        let response = Error::SessionExpired.into_response();

        assert_session_rejected(&response);
    }

    #[tokio::test]
    async fn validation_error_alert() {
        let response =
            Error::Validation(ValidationError::NonPositiveAmount).into_alert_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_eq!(select_text(&html, ".alert-message"), ["Invalid transaction"]);
        assert_eq!(
            select_text(&html, ".alert-details"),
            ["Amount must be greater than 0"]
        );
    }

    #[tokio::test]
    async fn backend_error_alert_shows_backend_message() {
        let error = Error::from(ApiError::Status {
            status: BackendStatus::BAD_REQUEST,
            body: r#"{"error": "Category not found"}"#.to_owned(),
        });

        let response = error.into_alert_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = parse_html_fragment(response).await;
        assert_eq!(select_text(&html, ".alert-details"), ["Category not found"]);
    }
}
