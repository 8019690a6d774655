//! Error taxonomy shared by the repository, unit of work and HTTP layers.

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ReviewsError {
    /// Input rejected before any store access.
    #[error("{message}")]
    Validation { message: String },

    /// A review whose restaurant reference is missing or does not resolve.
    #[error("Each submitted review must reference an existing Restaurant")]
    MissingRestaurant { restaurant_id: Option<Uuid> },

    /// Store failure reported by sqlx.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReviewsError {
    pub fn validation(message: impl Into<String>) -> Self {
        ReviewsError::Validation {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ReviewsError::Validation { .. } => StatusCode::BAD_REQUEST,
            ReviewsError::MissingRestaurant { .. } => StatusCode::BAD_REQUEST,
            ReviewsError::Database(_) | ReviewsError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns a user-safe error message, without leaking store details.
    pub fn user_message(&self) -> String {
        match self {
            ReviewsError::Validation { message } => message.clone(),
            ReviewsError::MissingRestaurant { .. } => self.to_string(),
            ReviewsError::Database(_) => "Database error occurred".to_string(),
            ReviewsError::Other(_) => "Internal server error".to_string(),
        }
    }

    /// Whether this failure was caused by the caller rather than the store.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

pub type Result<T> = std::result::Result<T, ReviewsError>;
