//! Assertions on the forms rendered by the log-in, registration and add-record pages.

use scraper::{ElementRef, Html, Selector};

#[track_caller]
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|error| panic!("Invalid selector {css:?}: {error}"))
}

#[track_caller]
fn assert_required(element: &ElementRef<'_>, name: &str) {
    assert!(
        element.value().attr("required").is_some(),
        "want {} named {name} to have the required attribute but got none",
        element.value().name()
    );
}

/// The first form in `html`.
#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&selector("form"))
        .next()
        .expect("No form found")
}

/// Assert that `form` submits to `endpoint` via the htmx attribute `attribute`, e.g. "hx-post".
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form.value().attr(attribute);

    assert_eq!(
        got,
        Some(endpoint),
        "want form with attribute {attribute}=\"{endpoint}\", got {got:?}"
    );
}

/// Assert that `form` has a required input named `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = form
        .select(&selector(&format!("input[name=\"{name}\"]")))
        .next()
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""));

    let got_type = input.value().attr("type").unwrap_or_default();
    assert_eq!(
        got_type, type_,
        "want input {name} with type \"{type_}\", got {got_type:?}"
    );
    assert_required(&input, name);
}

/// Assert that `form` has a required `<select>` named `name` offering every
/// value in `want_values`, in order, after any disabled placeholder.
#[track_caller]
pub(crate) fn assert_form_select(form: &ElementRef<'_>, name: &str, want_values: &[&str]) {
    let select = form
        .select(&selector(&format!("select[name=\"{name}\"]")))
        .next()
        .unwrap_or_else(|| panic!("No select found with name \"{name}\""));
    assert_required(&select, name);

    let got_values: Vec<_> = select
        .select(&selector("option:not([disabled])"))
        .map(|option| option.value().attr("value").unwrap_or_default())
        .collect();

    assert_eq!(
        got_values, want_values,
        "want select {name} to offer {want_values:?}, got {got_values:?}"
    );
}

/// Assert that the first button in `form` submits it.
#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    let button = form
        .select(&selector("button"))
        .next()
        .expect("No button found");

    assert_eq!(
        button.value().attr("type"),
        Some("submit"),
        "want submit button with type=\"submit\""
    );
}

/// Assert that the inline field error shown in `form` reads `want_error_message`.
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let got: Vec<String> = form
        .select(&selector("p.text-red-500"))
        .map(|error| error.text().collect::<String>().trim().to_owned())
        .collect();

    assert_eq!(
        got,
        [want_error_message],
        "want exactly one field error reading {want_error_message:?}"
    );
}
