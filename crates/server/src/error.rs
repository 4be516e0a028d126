use crate::dtos::ErrorResponse;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::BookingError;
use log::error;
use sea_orm::DbErr;
use thiserror::Error;

/// Errors a handler can end with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    MalformedBody(#[from] JsonRejection),
    #[error("Unauthorized")]
    Unauthorized,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Booking(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::MalformedBody(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Booking(_) | Self::Database(_) => {
                error!("Request failed: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
