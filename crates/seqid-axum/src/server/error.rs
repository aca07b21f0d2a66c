use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use seqid::{ParseCategoryError, StoreError};
use serde::Serialize;
use thiserror::Error;

/// Request failures, each mapped to a status code and a JSON `{"error"}` body.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid prefix `{0}`: expected ASCII letters, digits or '-', not ending in a digit")]
    InvalidPrefix(String),

    #[error(transparent)]
    UnknownCategory(#[from] ParseCategoryError),

    #[error(transparent)]
    Allocation(#[from] seqid::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPrefix(_) => StatusCode::BAD_REQUEST,
            Self::UnknownCategory(_) => StatusCode::NOT_FOUND,
            Self::Allocation(seqid::Error::Contention { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Allocation(seqid::Error::Store(StoreError::Duplicate { .. })) => {
                StatusCode::CONFLICT
            }
            Self::Allocation(seqid::Error::Store(StoreError::Unavailable { .. })) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Allocation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
