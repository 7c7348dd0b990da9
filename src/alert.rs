//! Alert messages for displaying errors to users.
//!
//! Error alerts are sent as HTMX fragments and swapped into the
//! `#alert-container` element by the `response-targets` extension.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

/// An error alert with a short summary and details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    message: String,
    details: String,
}

impl Alert {
    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    pub fn into_markup(self) -> Markup {
        let Alert { message, details } = self;
        let container_style = "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
            dark:bg-gray-800 dark:text-red-400 border border-red-300 \
            dark:border-red-800";

        html! {
            div class=(container_style) role="alert"
            {
                div class="flex items-start justify-between gap-4"
                {
                    div
                    {
                        span class="font-medium" { (message) }

                        @if !details.is_empty() {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="font-bold"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "×"
                    }
                }
            }
        }
    }

    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }
}

/// Render `alert` as an HTML fragment with the given status code.
pub fn render_alert(status_code: StatusCode, alert: Alert) -> Response {
    (status_code, alert.into_html()).into_response()
}
