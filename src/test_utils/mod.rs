#![allow(missing_docs)]

pub(crate) mod backend;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use backend::{StubBackend, TEST_EMAIL, TEST_PASSWORD, TEST_TOKEN, unreachable_backend};
pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_select, assert_form_submit_button,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{
    assert_valid_html, must_select, parse_html_document, parse_html_fragment, select_text,
};
pub(crate) use http::{
    assert_html_content_type, assert_hx_redirect, assert_session_rejected, assert_status_ok,
};
