//! The endpoint URIs served by the app.

/// The root route which redirects to the activity page or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users, listing their transactions.
pub const ACTIVITY_VIEW: &str = "/activity";
/// The page for recording a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/add";
/// The page with totals and charts for a time window.
pub const SUMMARY_VIEW: &str = "/summary";
/// The page showing the logged in user's account details.
pub const PROFILE_VIEW: &str = "/profile";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for registering a new user.
pub const REGISTER_API: &str = "/api/register";
/// The route for submitting a new transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
