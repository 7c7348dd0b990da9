//! Defines functions for handling the summary session with cookies.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{
    Duration, OffsetDateTime, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::{Error, auth::session::Session};

pub(crate) const COOKIE_SESSION: &str = "session";
/// The default duration for which session cookies are valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

/// Date time format for the session expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
         sign:mandatory]:[offset_minute]:[offset_second]"
);

/// Separates the session id from the expiry in the cookie value.
const VALUE_SEPARATOR: char = '|';

/// Add a cookie for `session` to the cookie jar.
///
/// The cookie value is "`id`|`expiry`" and the cookie expires with the session.
///
/// # Errors
/// Returns [Error::CookieError] if the expiry time cannot be formatted.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    session: &Session,
) -> Result<PrivateCookieJar, Error> {
    // Use format instead of to_string to avoid errors at midnight when the hour is printed as
    // a single digit when [DATE_TIME_FORMAT] expects two digits.
    let expiry_string = session
        .expires_at
        .format(DATE_TIME_FORMAT)
        .map_err(|error| Error::CookieError(error.to_string()))?;
    let value = format!("{}{VALUE_SEPARATOR}{expiry_string}", session.id);

    Ok(jar.add(
        Cookie::build((COOKIE_SESSION, value))
            .expires(session.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the session cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the session named by the cookie in `jar`.
///
/// Returns `None` if there is no session cookie, its value cannot be read, or it has expired.
/// The session may still have been revoked, check it against the
/// [SessionStore](crate::auth::SessionStore) before trusting it.
pub(crate) fn get_session_from_cookies(jar: &PrivateCookieJar) -> Option<Session> {
    let cookie = jar.get(COOKIE_SESSION)?;
    let (id, expiry) = cookie.value_trimmed().split_once(VALUE_SEPARATOR)?;
    let id = id.parse().ok()?;
    let expires_at = OffsetDateTime::parse(expiry, DATE_TIME_FORMAT).ok()?;

    if expires_at <= OffsetDateTime::now_utc() {
        tracing::debug!("Session {id} expired at {expires_at}");
        return None;
    }

    Some(Session { id, expires_at })
}
