use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::SearchError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidMode(_) | SearchError::EmptyQuery | SearchError::NegativePage(_) => {
                Self::validation(err.to_string())
            }
            SearchError::PrivateProfile => Self::Unauthorized(err.to_string()),
            SearchError::NotFound(id) => Self::not_found("Replay", id),
            SearchError::Database(msg) => Self::DatabaseError(msg),
            SearchError::Internal(msg) => Self::internal(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id} not found"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReplayId, SearchMode};

    fn status_of(err: SearchError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn search_errors_map_to_status_codes() {
        let invalid = SearchMode::resolve("weather").unwrap_err();
        assert_eq!(status_of(invalid.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(SearchError::EmptyQuery), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(SearchError::NegativePage(-1)), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(SearchError::PrivateProfile), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(SearchError::NotFound(ReplayId::new(7))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(SearchError::Database("locked".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
