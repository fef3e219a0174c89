//! Defines the page to display for an internal server error.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl InternalServerError<'_> {
    pub fn into_html(self) -> Html<String> {
        Html(error_view("Internal Server Error", "500", self.description, self.fix).into_string())
    }

    /// Render the error page with a status other than 500, e.g. for bad
    /// query parameters.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        let header = status.as_str().to_owned();

        (
            status,
            Html(error_view("Error", &header, self.description, self.fix).into_string()),
        )
            .into_response()
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.into_html()).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_utils::{assert_content_type, parse_html_document};

    use super::{InternalServerError, get_internal_server_error_page};

    #[tokio::test]
    async fn renders_500_page() {
        let response = get_internal_server_error_page().await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_content_type(&response, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn custom_status_is_shown_in_page() {
        let response = InternalServerError {
            description: "Bad dates",
            fix: "Pick a start date before the end date.",
        }
        .into_response_with_status(StatusCode::BAD_REQUEST);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("400"), "got {text}");
        assert!(text.contains("Bad dates"), "got {text}");
    }
}
