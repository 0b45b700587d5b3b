//! The page showing the logged in user's account details.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    alert::Alert,
    api::{ApiClient, Profile, Session},
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::get_local_offset,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day] [month repr:long] [year]");

pub const FETCH_ERROR_MSG: &str = "Failed to load your profile.";

/// The state needed for the profile page.
#[derive(Debug, Clone)]
pub struct ProfilePageState {
    /// The client used to fetch the profile.
    pub api_client: ApiClient,
    /// The reference timezone as a canonical timezone name, e.g. "Asia/Bangkok".
    pub local_timezone: String,
}

impl FromRef<AppState> for ProfilePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn profile_details(profile: &Profile, offset: UtcOffset) -> Markup {
    let created_at = profile
        .created_at
        .and_then(|created_at| created_at.checked_to_offset(offset))
        .and_then(|created_at| created_at.format(DATE_FORMAT).ok())
        .unwrap_or_else(|| "-".to_owned());

    html! {
        dl class="w-full divide-y divide-gray-200 dark:divide-gray-700"
        {
            @for (id, term, value) in [
                ("profile-id", "User ID", profile.id.as_str()),
                ("profile-email", "Email", profile.email.as_str()),
                ("profile-created-at", "Member since", created_at.as_str()),
            ] {
                div class="flex justify-between gap-4 py-3"
                {
                    dt class="text-sm text-gray-600 dark:text-gray-400" { (term) }
                    dd id=(id) class="font-medium break-all" { (value) }
                }
            }
        }
    }
}

fn profile_view(user_email: &str, body: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROFILE_VIEW, user_email).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full space-y-4 py-8"
            {
                h1 class="text-xl font-bold" { "Profile" }

                (body)
            }
        }
    };

    base("Profile", &[], &content)
}

/// Display the logged in user's ID, email and sign up date as reported by the backend.
pub async fn get_profile_page(
    State(state): State<ProfilePageState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let body = match state.api_client.profile(&session).await {
        Ok(profile) => profile_details(&profile, local_offset),
        Err(error) if error.is_unauthorized() => return Err(Error::SessionExpired),
        Err(error) => {
            tracing::error!("Could not fetch profile: {error}");
            Alert::Error {
                message: FETCH_ERROR_MSG.to_owned(),
                details: error.user_message(),
            }
            .into_html()
        }
    };

    Ok(profile_view(session.email(), body).into_response())
}
