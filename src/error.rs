//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::Date;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The bank reported an error in its response envelope.
    ///
    /// The error type and message are passed on verbatim.
    #[error("the bank reported an error: {error_type} {message}")]
    ProviderError {
        /// The provider's error category, e.g. "System".
        error_type: String,
        /// The provider's description of the error.
        message: String,
    },

    /// A transaction record could not be used.
    ///
    /// `index` is the position of the record in the fetched sequence.
    #[error("transaction {index} is malformed: {reason}")]
    MalformedRecord {
        /// The position of the record.
        index: usize,
        /// What is wrong with the record.
        reason: String,
    },

    /// The requested resource was not found.
    ///
    /// This occurs when the customer has no standard account.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The bank could not be reached or sent a response that could not be read.
    #[error("could not talk to the bank: {0}")]
    HttpError(String),

    /// The identity server rejected the client credentials.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not authenticate with the bank: {0}")]
    AuthenticationError(String),

    /// The transaction fixture file could not be loaded.
    #[error("could not load the fixture: {0}")]
    FixtureError(String),

    /// The start of a date range is after its end.
    #[error("the start date {start} is after the end date {end}")]
    InvalidDateRange {
        /// The first day of the range.
        start: Date,
        /// The last day of the range.
        end: Date,
    },

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::ProviderError {
                error_type,
                message,
            } => {
                tracing::error!("The bank reported an error: {error_type} {message}");
                InternalServerError {
                    description: "The bank reported an error",
                    fix: &format!("{error_type}: {message}"),
                }
                .into_response()
            }
            Error::MalformedRecord { ref reason, .. } => {
                tracing::error!("Could not summarize transactions: {self}");
                InternalServerError {
                    description: "Unreadable Transactions",
                    fix: &format!("A transaction from the bank could not be read: {reason}"),
                }
                .into_response()
            }
            Error::InvalidDateRange { start, end } => InternalServerError {
                description: "Invalid Date Range",
                fix: &format!("The start date {start} is after the end date {end}."),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
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
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidDateRange { start, end } => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid date range".to_owned(),
                    details: format!(
                        "The start date {start} is after the end date {end}. \
                        Pick a start date on or before the end date."
                    ),
                },
            ),
            Error::ProviderError {
                error_type,
                message,
            } => {
                tracing::error!("The bank reported an error: {error_type} {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: "The bank reported an error".to_owned(),
                        details: format!("{error_type}: {message}"),
                    },
                )
            }
            Error::MalformedRecord { index, reason } => {
                tracing::error!("Transaction {index} is malformed: {reason}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Unreadable transactions".to_owned(),
                        details: format!("A transaction from the bank could not be read: {reason}"),
                    },
                )
            }
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
