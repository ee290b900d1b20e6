use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use depot_core::error::DepotError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn status(&self) -> StatusCode {
        let Some(e) = self.0.downcast_ref::<DepotError>() else {
            return StatusCode::INTERNAL_SERVER_ERROR;
        };
        match e {
            DepotError::NotFound(_) => StatusCode::NOT_FOUND,
            DepotError::InvalidStatus(_)
            | DepotError::InvalidMovementType(_)
            | DepotError::InvalidDate(_)
            | DepotError::InvalidColumn(_)
            | DepotError::NotSortable(_)
            | DepotError::Validation { .. } => StatusCode::BAD_REQUEST,
            DepotError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            DepotError::TransitionInFlight(_) => StatusCode::CONFLICT,
            DepotError::FetchFailed(_)
            | DepotError::MutationFailed { .. }
            | DepotError::Backend { .. }
            | DepotError::Http(_) => StatusCode::BAD_GATEWAY,
            DepotError::NotInitialized
            | DepotError::Io(_)
            | DepotError::Yaml(_)
            | DepotError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
