//! Alert messages shown in the floating alert container.
//!
//! HTMX forms target `#alert-container` on error responses, so returning an
//! [Alert] from a handler replaces the container's contents with the alert.
//! Alerts can also be embedded directly in a page, e.g., to show a warning
//! above a list.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A success or error message. Errors may carry details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Something worked.
    SuccessSimple {
        /// The headline.
        message: String,
    },
    /// Something went wrong.
    Error {
        /// The headline.
        message: String,
        /// What went wrong and what the user can do about it.
        details: String,
    },
    /// Something went wrong, no details needed.
    ErrorSimple {
        /// The headline.
        message: String,
    },
}

impl Alert {
    fn is_error(&self) -> bool {
        matches!(self, Alert::Error { .. } | Alert::ErrorSimple { .. })
    }

    /// Render the alert as a dismissable box.
    pub fn into_html(self) -> Markup {
        let (container_style, icon_style) = if self.is_error() {
            (
                "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg shadow \
                text-red-800 bg-red-50 border border-red-200 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                "font-bold text-red-600 dark:text-red-400",
            )
        } else {
            (
                "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg shadow \
                text-green-800 bg-green-50 border border-green-200 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                "font-bold text-green-600 dark:text-green-400",
            )
        };
        let role = if self.is_error() { "alert" } else { "status" };

        let (message, details) = match self {
            Alert::Error { message, details } => (message, Some(details)),
            Alert::SuccessSimple { message } | Alert::ErrorSimple { message } => (message, None),
        };

        html! {
            div class=(container_style) role=(role) data-alert
            {
                span class=(icon_style) aria-hidden="true" { "!" }

                div class="flex-1"
                {
                    p class="font-medium alert-message" { (message) }

                    @if let Some(details) = details.filter(|details| !details.is_empty()) {
                        p class="mt-1 alert-details" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto text-current opacity-70 hover:opacity-100"
                    aria-label="Dismiss"
                    onclick="this.closest('[data-alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
