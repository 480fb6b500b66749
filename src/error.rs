use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum BookwormError {
    #[error("Book store is unreachable: {0}")]
    StoreUnavailable(SqlxError),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("No such user found with Username: {0}")]
    UserNotFound(String),

    #[error("Incorrect password for Username: {0}")]
    PasswordMismatch(String),

    #[error("Book {0} not found")]
    BookNotFound(i64),

    #[error("Invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Classification lookup failed: {0}")]
    ExternalLookup(#[from] reqwest::Error),

    #[error("Malformed classification response: {0}")]
    MalformedXml(#[from] quick_xml::DeError),

    #[error("Classification response contains no work for `{0}`")]
    MissingWork(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),
}

impl BookwormError {
    /// Message shown on the login form when a credential operation fails.
    /// Returns `None` for errors that must not be rendered into the form.
    pub fn login_message(&self) -> Option<String> {
        match self {
            BookwormError::UserExists(_)
            | BookwormError::UserNotFound(_)
            | BookwormError::PasswordMismatch(_)
            | BookwormError::InvalidField { .. } => Some(self.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for BookwormError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            BookwormError::StoreUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_UNAVAILABLE",
                "The book store is unreachable.".to_string(),
            ),
            BookwormError::Database(_)
            | BookwormError::Task(_)
            | BookwormError::Io(_)
            | BookwormError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred.".to_string(),
            ),
            BookwormError::UserExists(_)
            | BookwormError::UserNotFound(_)
            | BookwormError::PasswordMismatch(_) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                self.to_string(),
            ),
            BookwormError::BookNotFound(_) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string())
            }
            BookwormError::InvalidField { .. } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", self.to_string())
            }
            BookwormError::ExternalLookup(_)
            | BookwormError::MalformedXml(_)
            | BookwormError::MissingWork(_)
            | BookwormError::UrlParse(_) => (
                StatusCode::BAD_GATEWAY,
                "BAD_GATEWAY",
                self.to_string(),
            ),
        };
        (
            status,
            Json(ApiErrorResponse {
                error: ApiErrorBody {
                    code: code.to_string(),
                    message,
                },
            }),
        )
            .into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
