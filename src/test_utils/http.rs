//! Assertions on handler responses that have not been turned into HTML yet.

use axum::{
    body::Body,
    http::{StatusCode, header::CONTENT_TYPE},
    response::Response,
};

use crate::auth::SessionRejected;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[track_caller]
fn header_text<'a>(response: &'a Response<Body>, header_name: &str) -> &'a str {
    response
        .headers()
        .get(header_name)
        .unwrap_or_else(|| panic!("Headers missing {header_name}"))
        .to_str()
        .unwrap_or_else(|_| panic!("Header {header_name} is not valid text"))
}

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

/// Assert that `response` is a rendered page or fragment.
#[track_caller]
pub(crate) fn assert_html_content_type(response: &Response<Body>) {
    assert_eq!(header_text(response, CONTENT_TYPE.as_str()), HTML_CONTENT_TYPE);
}

/// Assert that `response` tells htmx to navigate to `endpoint`.
#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(header_text(response, "hx-redirect"), endpoint);
}

/// Assert that `response` is the bare 401 a handler returns when the backend
/// stops accepting the session token.
#[track_caller]
pub(crate) fn assert_session_rejected(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(
        response.extensions().get::<SessionRejected>().is_some(),
        "want the response to be marked as a rejected session"
    );
}
