use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::{identity::IdentityError, store::StoreError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Sign-in rejected")]
    Unauthorized,

    #[error("Identity provider not configured")]
    IdentityUnavailable,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Identity provider error: {0}")]
    Identity(IdentityError),
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Rejected => AppError::Unauthorized,
            other => AppError::Identity(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::IdentityUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Identity { .. } => StatusCode::BAD_GATEWAY,
        };

        if status.is_server_error() {
            error!("{self}");
        }

        (status, self.to_string()).into_response()
    }
}
