use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// The stored thing a lookup failed to find, with the ids that were asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Film(i64),
    User(i64),
    Like { film_id: i64, user_id: i64 },
    Mpa(i64),
    Genre(i64),
}

impl Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Film(id) => write!(f, "film {}", id),
            Entity::User(id) => write!(f, "user {}", id),
            Entity::Like { film_id, user_id } => {
                write!(f, "like of film {} by user {}", film_id, user_id)
            }
            Entity::Mpa(id) => write!(f, "mpa rating {}", id),
            Entity::Genre(id) => write!(f, "genre {}", id),
        }
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(Entity),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Migration(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
