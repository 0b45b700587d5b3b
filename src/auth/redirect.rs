//! Works out where to send a user after they log in.
//!
//! Protected pages send anonymous visitors to the log-in page with the page
//! they asked for in the `redirect_url` query parameter. Only same-site paths
//! are accepted as targets, and never the auth pages themselves, so a crafted
//! link cannot bounce a user to another site or into a log-in loop.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Pages a user should never be sent back to after logging in.
const AUTH_PAGES: [&str; 3] = [
    endpoints::LOG_IN_VIEW,
    endpoints::REGISTER_VIEW,
    endpoints::LOG_OUT,
];

fn is_auth_page(path_and_query: &str) -> bool {
    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path);

    AUTH_PAGES.contains(&path)
}

/// Reduce `raw_url` to a same-site path and query, or `None` if it is not a
/// safe place to redirect to.
///
/// Absolute URLs are only accepted when `allow_absolute` is set, which is the
/// case for the `HX-Current-URL` header since browsers always send the full
/// URL there. Their scheme and host are dropped.
pub(crate) fn sanitize_redirect_target(raw_url: &str, allow_absolute: bool) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if !allow_absolute && (uri.scheme().is_some() || uri.authority().is_some()) {
        return None;
    }

    let path_and_query = uri.path_and_query()?.as_str();

    if !path_and_query.starts_with('/')
        || path_and_query.starts_with("//")
        || is_auth_page(path_and_query)
    {
        return None;
    }

    Some(path_and_query.to_owned())
}

/// The log-in page URL with `target` as the page to return to.
pub(crate) fn log_in_url_with_target(target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("redirect_url", target)]) {
        Ok(query) => Some(format!("{}?{query}", endpoints::LOG_IN_VIEW)),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            None
        }
    }
}

/// The log-in page URL that returns the user to the page `request` came from.
///
/// Page requests return to the requested URL. HTMX requests to `/api` return
/// to the page that made them, read from the `HX-Current-URL` header.
pub(crate) fn log_in_url_for_request(request: &Request) -> Option<String> {
    let target = if request.uri().path().starts_with("/api") {
        target_from_hx_headers(request)?
    } else {
        let path_and_query = request.uri().path_and_query()?.as_str();
        sanitize_redirect_target(path_and_query, false)?
    };

    log_in_url_with_target(&target)
}

fn target_from_hx_headers(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    else {
        tracing::warn!("Missing HX-Current-URL header for /api request.");
        return None;
    };

    let target = sanitize_redirect_target(current_url, true);
    if target.is_none() {
        tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    target
}
