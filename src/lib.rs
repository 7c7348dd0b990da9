//! Purchase Tracker is a web app for recording purchases and reviewing simple
//! summary figures.
//!
//! Purchases are kept in a single CSV file. This library provides the record
//! store, the form validation and aggregation logic, and a REST API that
//! directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod purchase;
mod routing;
mod summary;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{Session, SessionStore};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use purchase::{
    Category, PaymentMethod, PurchaseFields, PurchaseForm, PurchaseRecord, RecordStore,
    ValidationError, validate_create, validate_edit,
};
pub use routing::build_router;
pub use summary::{Summary, purchases_over_time, summarize};

use crate::{
    alert::{Alert, render_alert},
    internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The backing file could not be read, or its contents are not a valid
    /// purchases CSV file.
    ///
    /// Rows are never skipped: a single bad row fails the whole read.
    #[error("could not read purchases: {0}")]
    StorageRead(String),

    /// The backing file could not be written.
    ///
    /// The file on disk is left as it was before the write was attempted.
    #[error("could not save purchases: {0}")]
    StorageWrite(String),

    /// A submitted field value broke one of the purchase record invariants.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No purchase has the requested purchase ID.
    #[error("the requested purchase could not be found")]
    NotFound,

    /// The password entered for the summary page was wrong.
    #[error("invalid password")]
    InvalidCredentials,

    /// The session cookie could not be created.
    #[error("could not create the session cookie: {0}")]
    CookieError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the lock on the record store.
    #[error("could not acquire the record store lock")]
    LockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::StorageRead(error) => {
                tracing::error!("Could not read purchases: {error}");
                InternalServerError {
                    description: "Could not read purchases",
                    fix: "Check that the data file is a valid purchases CSV file, then try again.",
                }
                .into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for HTMX requests.
    fn into_alert_response(self) -> Response {
        match self {
            Error::Validation(error) => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error("Invalid purchase details", &error.to_string()),
            ),
            Error::NotFound => render_alert(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not update purchase",
                    "The purchase could not be found. \
                    Try refreshing the page to see the current list of purchases.",
                ),
            ),
            Error::StorageRead(error) => {
                tracing::error!("Could not read purchases: {error}");
                render_alert(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Could not read purchases",
                        "The data file could not be read. Check the server logs for more details.",
                    ),
                )
            }
            Error::StorageWrite(error) => {
                tracing::error!("Could not save purchases: {error}");
                render_alert(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Could not save purchases",
                        "The data file was not changed. Check the server logs for more details.",
                    ),
                )
            }
            Error::InvalidTimezoneError(timezone) => render_alert(
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                ),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                render_alert(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
            }
        }
    }
}
