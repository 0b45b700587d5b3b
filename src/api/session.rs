//! The credentials and session used to talk to the backend.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// The email and password a user logs in or registers with.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// The user's email address.
    pub email: String,
    /// The user's password in plain text.
    pub password: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// An authenticated session with the backend.
///
/// Created when the backend accepts a log-in and dropped on log-out or when
/// the backend stops accepting the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    email: String,
}

impl Session {
    /// Create a session for the user `email` with the bearer token `token`.
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
        }
    }

    /// The bearer token to send with authenticated requests.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The email address the user logged in with.
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"********")
            .field("email", &self.email)
            .finish()
    }
}
