//! Errors returned by the backend client.

use reqwest::StatusCode;

/// The ways a call to the backend can fail.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("could not reach the backend: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("the backend responded with {status}: {body}")]
    Status {
        /// The HTTP status of the response.
        status: StatusCode,
        /// The response body as text.
        body: String,
    },

    /// The backend answered with a payload that does not have the expected shape.
    #[error("the backend sent a malformed response: {0}")]
    MalformedResponse(String),

    /// The backend accepted a log-in but did not issue a token.
    #[error("the backend did not issue a session token")]
    MissingToken,
}

impl ApiError {
    /// Whether the backend rejected the credentials or session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Status { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }

    /// Whether the backend refused the request itself, as opposed to failing
    /// to handle it.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if status.is_client_error())
    }

    /// A short explanation that can be shown to the user.
    ///
    /// Uses the `message` or `error` field of a JSON error body when the
    /// backend provides one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => {
                "Could not reach the server. Please try again later.".to_owned()
            }
            ApiError::Status { status, body } => {
                backend_message(body).unwrap_or_else(|| format!("Server error: {status}"))
            }
            ApiError::MalformedResponse(_) => {
                "The server sent a response that could not be understood.".to_owned()
            }
            ApiError::MissingToken => "The server did not return a session token.".to_owned(),
        }
    }
}

fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::ApiError;

    fn status_error(status: StatusCode, body: &str) -> ApiError {
        ApiError::Status {
            status,
            body: body.to_owned(),
        }
    }

    #[test]
    fn unauthorized_statuses() {
        assert!(status_error(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(status_error(StatusCode::FORBIDDEN, "").is_unauthorized());
        assert!(!status_error(StatusCode::INTERNAL_SERVER_ERROR, "").is_unauthorized());
        assert!(!ApiError::MissingToken.is_unauthorized());
    }

    #[test]
    fn client_error_statuses() {
        assert!(status_error(StatusCode::BAD_REQUEST, "").is_client_error());
        assert!(status_error(StatusCode::UNAUTHORIZED, "").is_client_error());
        assert!(status_error(StatusCode::NOT_FOUND, "").is_client_error());
        assert!(!status_error(StatusCode::INTERNAL_SERVER_ERROR, "").is_client_error());
        assert!(!status_error(StatusCode::BAD_GATEWAY, "").is_client_error());
        assert!(!ApiError::MalformedResponse(String::new()).is_client_error());
    }

    #[test]
    fn user_message_prefers_backend_message() {
        let error = status_error(StatusCode::CONFLICT, r#"{"message": "Email already in use"}"#);

        assert_eq!(error.user_message(), "Email already in use");
    }

    #[test]
    fn user_message_reads_error_field() {
        let error = status_error(StatusCode::BAD_REQUEST, r#"{"error": "Category not found"}"#);

        assert_eq!(error.user_message(), "Category not found");
    }

    #[test]
    fn user_message_falls_back_to_status() {
        let error = status_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");

        assert_eq!(error.user_message(), "Server error: 502 Bad Gateway");
    }
}
