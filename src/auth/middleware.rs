//! Middleware that only lets clients with a valid summary session through.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    AppState,
    auth::{cookie::get_session_from_cookies, session::SessionStore},
    endpoints,
};

/// The state needed for the summary guard.
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The sessions that have not been revoked.
    pub sessions: SessionStore,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            sessions: state.sessions.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid session cookie naming an open session.
///
/// The [Session](crate::auth::Session) is placed into the request and the request executed
/// normally if the session is open, otherwise the client is redirected to the log-in page.
///
/// **Note**: Route handlers can use the function argument `Extension(session): Extension<Session>` to receive the session.
pub async fn summary_guard(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::<Key>::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return Redirect::to(endpoints::LOG_IN_VIEW).into_response();
        }
    };

    let Some(session) = get_session_from_cookies(&jar) else {
        tracing::debug!("No valid session for {}", parts.uri.path());
        return Redirect::to(endpoints::LOG_IN_VIEW).into_response();
    };

    match state.sessions.is_active(&session) {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!("Rejected closed session {} for {}", session.id, parts.uri.path());
            return Redirect::to(endpoints::LOG_IN_VIEW).into_response();
        }
        Err(error) => return error.into_response(),
    }

    parts.extensions.insert(session);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

#[cfg(test)]
mod summary_guard_tests {
    use axum::{
        Extension, Router,
        http::StatusCode,
        middleware,
        response::Html,
        routing::get,
    };
    use axum::extract::State;
    use axum_extra::extract::PrivateCookieJar;
    use axum_test::TestServer;
    use time::Duration;

    use crate::{
        Error,
        app_state::create_cookie_key,
        auth::{
            AuthState, Session,
            cookie::{COOKIE_SESSION, get_session_from_cookies, set_session_cookie},
            session::SessionStore,
            summary_guard,
        },
        endpoints,
    };

    async fn test_handler(Extension(_session): Extension<Session>) -> Html<&'static str> {
        Html("<h1>Summary</h1>")
    }

    async fn stub_log_in_route(
        State(state): State<AuthState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        let session = state.sessions.open(Duration::minutes(5))?;
        set_session_cookie(jar, &session)
    }

    async fn stub_expired_log_in_route(
        State(state): State<AuthState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        let session = state.sessions.open(Duration::seconds(-5))?;
        set_session_cookie(jar, &session)
    }

    async fn stub_revoke_route(State(state): State<AuthState>, jar: PrivateCookieJar) -> StatusCode {
        match get_session_from_cookies(&jar).map(|session| state.sessions.revoke(session.id)) {
            Some(Ok(true)) => StatusCode::OK,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    const TEST_LOG_IN_ROUTE: &str = "/stub_log_in";
    const TEST_EXPIRED_LOG_IN_ROUTE: &str = "/stub_expired_log_in";
    const TEST_REVOKE_ROUTE: &str = "/stub_revoke";
    const TEST_PROTECTED_ROUTE: &str = "/protected";

    fn get_test_server() -> TestServer {
        let state = AuthState {
            cookie_key: create_cookie_key("nafstenoas"),
            sessions: SessionStore::new(),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), summary_guard))
            .route(TEST_LOG_IN_ROUTE, get(stub_log_in_route))
            .route(TEST_EXPIRED_LOG_IN_ROUTE, get(stub_expired_log_in_route))
            .route(TEST_REVOKE_ROUTE, get(stub_revoke_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn get_protected_route_with_session() {
        let server = get_test_server();

        let response = server.get(TEST_LOG_IN_ROUTE).await;
        response.assert_status_ok();
        let session_cookie = response.cookie(COOKIE_SESSION);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(session_cookie)
            .await;

        response.assert_status_ok();
        response.assert_text("<h1>Summary</h1>");
    }

    #[tokio::test]
    async fn get_protected_route_without_session_redirects() {
        let server = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn get_protected_route_with_expired_session_redirects() {
        let server = get_test_server();

        let response = server.get(TEST_EXPIRED_LOG_IN_ROUTE).await;
        let session_cookie = response.cookie(COOKIE_SESSION);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(session_cookie)
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn get_protected_route_with_revoked_session_redirects() {
        let server = get_test_server();

        let response = server.get(TEST_LOG_IN_ROUTE).await;
        let session_cookie = response.cookie(COOKIE_SESSION);
        server
            .get(TEST_REVOKE_ROUTE)
            .add_cookie(session_cookie.clone())
            .await
            .assert_status_ok();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(session_cookie)
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn get_protected_route_with_session_from_other_server_redirects() {
        let issuing_server = get_test_server();
        let response = issuing_server.get(TEST_LOG_IN_ROUTE).await;
        let session_cookie = response.cookie(COOKIE_SESSION);

        let response = get_test_server()
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(session_cookie)
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }
}
