//! Error types for the web layer.
//!
//! Errors are rendered as simple HTML error pages rather than JSON,
//! since this is a user-facing HTML application. Validation problems
//! never reach this type; they re-render the originating form instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, html};

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// A post id or username that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An authenticated user acting on somebody else's post.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A request body the handler could not make sense of.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error (database, file storage, etc.).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                format!("The page you were looking for does not exist: {msg}"),
            ),
            Self::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                "Forbidden",
                format!("You are not allowed to do that: {msg}"),
            ),
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad Request",
                format!("The request could not be processed: {msg}"),
            ),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error",
                    "Something went wrong on our side. Please try again later.".to_string(),
                )
            }
        };

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) " - Quill" }
                    meta name="robots" content="noindex";
                    style { (maud::PreEscaped(crate::render::components::PAGE_CSS)) }
                }
                body {
                    main class="error-page" {
                        h1 { (title) }
                        p { (message) }
                        a href="/" { "Back to the blog" }
                    }
                }
            }
        };

        (status, markup).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_not_found() {
        let err = WebError::NotFound("post abc".to_string());
        assert_eq!(err.to_string(), "not found: post abc");
    }

    #[test]
    fn error_display_forbidden() {
        let err = WebError::Forbidden("not your post".to_string());
        assert_eq!(err.to_string(), "forbidden: not your post");
    }

    #[test]
    fn error_into_response_not_found() {
        let err = WebError::NotFound("post xyz".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_into_response_forbidden() {
        let err = WebError::Forbidden("nope".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn error_into_response_internal() {
        let err = WebError::Internal(anyhow::anyhow!("boom"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
