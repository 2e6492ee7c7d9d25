use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::state::{calibration::CalibrationError, state_machine::MatchError};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The match rejected a transition.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<CalibrationError> for ServiceError {
    fn from(err: CalibrationError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// A match transition was refused; carries its stable code.
    #[error("{source}")]
    Match {
        /// Rejected transition.
        source: MatchError,
    },
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Match(source) => AppError::Match { source },
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, None),
            AppError::Match { source } if source.is_conflict() => {
                (StatusCode::CONFLICT, Some(source.code()))
            }
            AppError::Match { source } => (StatusCode::BAD_REQUEST, Some(source.code())),
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
            code,
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_errors_keep_their_code() {
        let response = AppError::from(ServiceError::from(MatchError::NothingToUndo)).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response =
            AppError::from(ServiceError::from(MatchError::TooManyDarts(4))).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_resources_are_not_found() {
        let response = AppError::from(ServiceError::NotFound("cam-1".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn calibration_errors_are_bad_requests() {
        let err = ServiceError::from(CalibrationError::NonPositiveRadius(0.0));
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
