use crate::{
    dtos::{
        ErrorResponse,
        reservation::{
            ConfirmedResponse, ReservationResponse, WAITLISTED_MESSAGE, WaitlistedResponse,
        },
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::services::{allocation::Allocation, booking::BookingService};
use models::request::ReservationRequest;

/// Book a table for a one-hour slot
///
/// A full slot is not an error: the customer is put on the waitlist and the
/// request answers 202.
#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = ReservationRequest,
    responses(
        (status = 201, description = "Reservation confirmed", body = ConfirmedResponse),
        (status = 202, description = "Slot full, added to the waitlist", body = WaitlistedResponse),
        (status = 400, description = "Invalid or malformed request", body = ErrorResponse),
        (status = 409, description = "No table could be assigned", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    body: Result<Json<ReservationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    let booking = BookingService::book(&state.allocator, &request).await?;

    let response = match booking.allocation {
        Allocation::Confirmed(reservation) => (
            StatusCode::CREATED,
            Json(ConfirmedResponse {
                success: true,
                message: "Reservation confirmed".to_string(),
                reservation: ReservationResponse::new(&reservation, Some(&booking.customer)),
            }),
        )
            .into_response(),
        Allocation::Waitlisted(entry) => (
            StatusCode::ACCEPTED,
            Json(WaitlistedResponse {
                success: false,
                error: WAITLISTED_MESSAGE.to_string(),
                waitlist: true,
                entry_id: entry.id.to_string(),
            }),
        )
            .into_response(),
        Allocation::Rejected(reason) => {
            (StatusCode::CONFLICT, Json(ErrorResponse::new(reason))).into_response()
        }
    };

    Ok(response)
}
