//! The password gate in front of the summary page.
//!
//! Entering the summary password opens a session in the [SessionStore] and
//! stores its id in an encrypted cookie. The `summary_guard` middleware turns
//! that cookie into a [Session] for the summary handler while the session is
//! open, or redirects to the log-in page. Logging out closes the session.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod session;

pub use session::{Session, SessionStore};
pub(crate) use cookie::DEFAULT_COOKIE_DURATION;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::summary_guard;

#[cfg(test)]
pub(crate) use cookie::COOKIE_SESSION;

#[cfg(test)]
pub(crate) use middleware::AuthState;
