//! Keeps track of who is logged in.
//!
//! The backend issues a bearer token at log-in. The token and the user's email
//! are kept in a private cookie, and the auth guards hand them to
//! protected handlers as a [Session](crate::api::Session) request extension.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register_user;
mod token;

pub use cookie::{
    DEFAULT_COOKIE_DURATION, get_session_from_cookies, invalidate_session_cookie,
    set_session_cookie,
};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{SessionRejected, auth_guard, auth_guard_hx};
pub use register_user::{get_register_page, post_register};
pub(super) use token::Token;

#[cfg(test)]
pub(crate) use cookie::COOKIE_SESSION;

#[cfg(test)]
pub use middleware::AuthState;
