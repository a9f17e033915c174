use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {message}")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },
}

/// Failures of the saved-recipe database.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored document is not valid JSON: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("Database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Could not prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Could not reach the recipe directory: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Recipe directory answered with status {0}")]
    Status(u16),

    #[error("Unexpected recipe directory response: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StoreClientError {
    #[error("Could not reach the recipe store: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Recipe store answered with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected recipe store response: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("No search result number {0}")]
    NoSuchResult(usize),

    #[error(transparent)]
    Store(#[from] StoreClientError),
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors returned by the store HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Internal server error")]
    Persistence(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload => StatusCode::BAD_REQUEST,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
