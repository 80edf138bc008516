use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fesroute_core::prelude::Error;
use serde::Serialize;
use tokio::task::JoinError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Routing(Error),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Routing(Error::NoNearbyRoad(_)) => StatusCode::NOT_FOUND,
            ApiError::Routing(Error::Unreachable) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Routing(
                Error::InvalidSegment { .. }
                | Error::InvalidData(_)
                | Error::JsonError(_)
                | Error::CsvError(_),
            ) => StatusCode::BAD_REQUEST,
            ApiError::Routing(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Routing(err)
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Internal(format!("worker task failed: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Routing(err) => err.to_string(),
            ApiError::Internal(message) => message,
        };

        if status.is_server_error() {
            tracing::error!(%status, "{message}");
        } else {
            tracing::debug!(%status, "{message}");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
