//! Alert system for displaying success and error messages to users.
//!
//! Alerts are swapped into the `#alert-container` element of the base page
//! when an HTMX request fails.

use maud::{Markup, html};

/// An alert message with its styling.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details, container_style, icon) = match self {
            Alert::Error { message, details } => (
                message,
                details,
                "text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
                    dark:text-red-400 dark:border-red-800",
                "!",
            ),
        };

        html! {
            div
                id="alert"
                role="alert"
                class={"flex items-start p-4 mb-4 text-sm border rounded-lg shadow " (container_style)}
            {
                span class="shrink-0 mr-3 font-bold" aria-hidden="true" { (icon) }

                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-3 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8 hover:opacity-75"
                    aria-label="Close"
                    onclick="this.closest('#alert').remove()"
                {
                    "×"
                }
            }
        }
    }
}
