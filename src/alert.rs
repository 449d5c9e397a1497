//! Alert partials for displaying error messages to users.
//!
//! Alerts are returned as HTMX-friendly fragments so endpoints can surface
//! problems without a full page reload.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// An error alert with a short title and optional details.
pub struct Alert<'a> {
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new error alert.
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self { message, details }
    }

    pub fn into_markup(self) -> Markup {
        html!(
            div
                class="p-4 mb-4 text-sm rounded-lg text-red-800 bg-red-50 \
                    dark:bg-gray-800 dark:text-red-400"
                role="alert"
            {
                span class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    " " (self.details)
                }
            }
        )
    }
}

/// Render an alert fragment with the given status code.
pub fn render_alert(status_code: StatusCode, alert: Alert) -> Response {
    (status_code, alert.into_markup()).into_response()
}
