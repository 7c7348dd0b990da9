//! This file defines the routes for displaying the log-in page and handling log-in requests
//! for the summary page.

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        cookie::{invalidate_session_cookie, set_session_cookie},
        session::SessionStore,
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, card, loading_spinner, password_input},
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect password.";

fn log_in_form(password: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (password_input(password, error_message))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Log in"
            }
        }
    }
}

/// Display the log-in page for the summary figures.
pub async fn get_log_in_page() -> Response {
    let log_in_form = log_in_form("", None);
    let content = card("Enter the password to view the summary", &log_in_form);
    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,
    /// The password that unlocks the summary page.
    pub summary_password: String,
    /// Where a successful log-in records its session.
    pub sessions: SessionStore,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            summary_password: state.summary_password.clone(),
            sessions: state.sessions.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Password entered during log-in.
    pub password: String,
}

/// Check `entered` against the summary password with an exact string comparison.
///
/// # Errors
/// Returns [Error::InvalidCredentials] if the passwords differ.
fn check_password(entered: &str, summary_password: &str) -> Result<(), Error> {
    if entered == summary_password {
        Ok(())
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, a session is opened, its cookie is set and the client is
/// redirected to the summary page.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    if let Err(error) = check_password(&user_data.password, &state.summary_password) {
        tracing::info!("Rejected log-in attempt: {error}");
        return log_in_form("", Some(INVALID_CREDENTIALS_ERROR_MSG)).into_response();
    }

    state
        .sessions
        .open(state.cookie_duration)
        .and_then(|session| set_session_cookie(jar.clone(), &session))
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::SUMMARY_VIEW.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error starting session: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_session_cookie(jar),
            )
        })
        .into_response()
}
