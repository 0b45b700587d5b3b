//! Client for the remote budget tracker backend.
//!
//! The backend owns persistence and authentication. Every call other than
//! log-in and registration needs a [Session], which carries the bearer token
//! issued at log-in. Responses are checked against the expected shape here, so
//! the rest of the app only ever sees validated domain types.

mod client;
mod error;
mod models;
mod session;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use models::Profile;
pub use session::{Credentials, Session};
