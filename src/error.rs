use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{backend::BackendError, models::ErrorBody, storage::StorageError};

/// PortalError
///
/// Errors surfaced by the HTTP layer. Authorization outcomes are not errors; they are
/// applied as redirects by the guard.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("session storage failure: {0}")]
    Storage(#[from] StorageError),
    #[error("client scope was not resolved for this request")]
    MissingScope,
}

impl PortalError {
    pub fn status(&self) -> StatusCode {
        match self {
            PortalError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PortalError::Backend(BackendError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            PortalError::Backend(BackendError::Rejected { status, .. })
                if (400..500).contains(status) =>
            {
                StatusCode::BAD_REQUEST
            }
            PortalError::Backend(_) => StatusCode::BAD_GATEWAY,
            PortalError::Storage(_) | PortalError::MissingScope => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
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
