//! Log-out route handler that ends the backend session, clears the session cookie, and redirects users.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    AppState,
    api::ApiClient,
    auth::{get_session_from_cookies, invalidate_session_cookie},
    endpoints,
};

/// The state needed to log a user out.
#[derive(Debug, Clone)]
pub struct LogOutState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The client used to end the session on the backend.
    pub api_client: ApiClient,
}

impl FromRef<AppState> for LogOutState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            api_client: state.api_client.clone(),
        }
    }
}

impl FromRef<LogOutState> for Key {
    fn from_ref(state: &LogOutState) -> Self {
        state.cookie_key.clone()
    }
}

/// Tell the backend to end the session, invalidate the session cookie and
/// redirect the client to the log-in page.
///
/// The cookie is cleared even if the backend call fails.
pub async fn get_log_out(State(state): State<LogOutState>, jar: PrivateCookieJar) -> Response {
    if let Some(session) = get_session_from_cookies(&jar)
        && let Err(error) = state.api_client.log_out(&session).await
    {
        tracing::warn!("Backend log-out failed, clearing the session anyway: {error}");
    }

    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
