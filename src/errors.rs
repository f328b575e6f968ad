// errors.rs
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, auth, etc.) or downstream layers (DB).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Too Many Requests: {0}")]
    TooManyRequests(String),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::Forbidden(_) => 403,
            ServerError::TooManyRequests(_) => 429,
            ServerError::DbError(_) | ServerError::InternalError => 500,
        }
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::NotFound => "Not Found".to_string(),
            ServerError::BadRequest(msg)
            | ServerError::Unauthorized(msg)
            | ServerError::Forbidden(msg)
            | ServerError::TooManyRequests(msg) => msg.clone(),
            ServerError::DbError(_) | ServerError::InternalError => {
                "Internal Server Error".to_string()
            }
        }
    }
}
