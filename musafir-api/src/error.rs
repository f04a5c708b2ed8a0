use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use musafir_core::BookingError;
use serde_json::json;

/// Boundary wrapper mapping the domain taxonomy onto HTTP. Every error
/// body has the same shape: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError(pub BookingError);

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            BookingError::ItemNotFound | BookingError::BookingNotFound => {
                (StatusCode::NOT_FOUND, self.0.to_string())
            }
            BookingError::Forbidden => (StatusCode::FORBIDDEN, self.0.to_string()),
            BookingError::Store(err) => {
                tracing::error!("Internal Server Error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            other => (StatusCode::BAD_REQUEST, other.to_string()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
