use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::usecases::booking::BookingError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, error_code) = match &self {
            // Don't leak internal error detail to the client.
            BookingError::Internal(_) => {
                (
                    "Internal server error".to_string(),
                    None,
                )
            }
            BookingError::EntitlementDenied(reason) => {
                (reason.message().to_string(), Some(reason.to_string()))
            }
            BookingError::SlotUnavailable => {
                (self.to_string(), Some("SLOT_UNAVAILABLE".to_string()))
            }
            other => (other.to_string(), None),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
            error_code,
        });

        (status, body).into_response()
    }
}
