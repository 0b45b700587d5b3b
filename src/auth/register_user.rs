//! The registration page for creating an account on the backend.

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    api::{ApiClient, Credentials},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        email_input, field_error, loading_spinner, log_in_register, password_input,
    },
};

pub const PASSWORD_MISMATCH_ERROR_MSG: &str = "Passwords do not match";

fn confirm_password_input(error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus[error_message.is_some()]
            ;

            (field_error(error_message))
        }
    }
}

fn registration_form(
    email: &str,
    email_error_message: Option<&str>,
    confirm_password_error_message: Option<&str>,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #confirm-password, #submit-button"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, email_error_message))
            (password_input("password", "Password", 0, None))
            (confirm_password_input(confirm_password_error_message))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Sign up"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", None, None);
    let content = log_in_register("Create an account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The client used to create the account on the backend.
    pub api_client: ApiClient,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
        }
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

fn log_in_after_registration_url() -> String {
    format!("{}?registered=true", endpoints::LOG_IN_VIEW)
}

/// Create an account on the backend and send the user to the log-in page.
///
/// The passwords must match before the backend is contacted. Errors reported
/// by the backend, e.g. an email that is already registered, are shown in the form.
pub async fn post_register(
    State(state): State<RegistrationState>,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let email = user_data.email.trim();

    if user_data.password != user_data.confirm_password {
        return registration_form(email, None, Some(PASSWORD_MISMATCH_ERROR_MSG)).into_response();
    }

    let credentials = Credentials {
        email: email.to_owned(),
        password: user_data.password,
    };

    match state.api_client.register(&credentials).await {
        Ok(()) => {
            tracing::info!("Registered a new account for {email}");
            (
                HxRedirect(log_in_after_registration_url()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!("Could not register {email}: {error}");
            registration_form(email, Some(&error.user_message()), None).into_response()
        }
    }
}

#[cfg(test)]
mod get_register_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_html_content_type,
            assert_hx_endpoint, assert_valid_html, must_get_form, parse_html_document,
            select_text,
        },
    };

    use super::get_register_page;

    #[tokio::test]
    async fn render_register_page() {
        let response = get_register_page().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_html_content_type(&response);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        assert_eq!(select_text(&document, "h1"), ["Create an account"]);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::REGISTER_API, "hx-post");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "password", "password");
        assert_form_input(&form, "confirm_password", "password");
        assert_form_submit_button(&form);

        let links: Vec<_> = form
            .select(&scraper::Selector::parse("a[href]").unwrap())
            .collect();
        assert_eq!(links.len(), 1, "want 1 link, got {}", links.len());
        assert_eq!(
            links[0].value().attr("href"),
            Some(endpoints::LOG_IN_VIEW),
            "want link to {}, got {:?}",
            endpoints::LOG_IN_VIEW,
            links[0].value().attr("href")
        );
    }
}
