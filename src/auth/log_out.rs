//! Log-out route handler that ends the summary session and redirects to the log-in page.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    auth::{
        cookie::{get_session_from_cookies, invalidate_session_cookie},
        session::SessionStore,
    },
    endpoints,
};

/// Revoke the client's session, invalidate its cookie and redirect to the log-in page.
///
/// Once revoked, the old cookie no longer opens the summary even if the client kept a copy.
pub async fn get_log_out(State(sessions): State<SessionStore>, jar: PrivateCookieJar) -> Response {
    if let Some(session) = get_session_from_cookies(&jar) {
        match sessions.revoke(session.id) {
            Ok(true) => tracing::info!("Revoked session {}", session.id),
            Ok(false) => tracing::debug!("Session {} was already closed", session.id),
            Err(error) => return error.into_response(),
        }
    }

    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
