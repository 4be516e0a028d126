use crate::{
    dtos::{
        ErrorResponse,
        admin::{
            AdminQuery, AdminReservationsResponse, SubscribersResponse, WaitlistResponse,
        },
        reservation::ReservationResponse,
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
};
use database::services::admin::AdminService;
use models::listing::{RawListing, ReservationListing};

fn authorize(state: &AppState, token: Option<&str>) -> Result<(), ApiError> {
    if state.is_admin(token) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// List reservations with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/admin/reservations",
    params(AdminQuery, RawListing),
    responses(
        (status = 200, description = "Page of reservations", body = AdminReservationsResponse),
        (status = 401, description = "Missing or wrong token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("admin_token" = [])),
    tag = "Admin"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
    Query(raw): Query<RawListing>,
) -> Result<Json<AdminReservationsResponse>, ApiError> {
    authorize(&state, query.token.as_deref())?;

    let listing = ReservationListing::resolve(&raw);
    let (rows, total) = AdminService::list_reservations(&state.db, &listing).await?;

    Ok(Json(AdminReservationsResponse {
        success: true,
        reservations: rows
            .iter()
            .map(|(reservation, customer)| ReservationResponse::new(reservation, customer.as_ref()))
            .collect(),
        page: listing.page,
        per_page: listing.per_page,
        total,
    }))
}

/// List newsletter subscribers
#[utoipa::path(
    get,
    path = "/api/admin/newsletter",
    params(AdminQuery),
    responses(
        (status = 200, description = "Subscribers", body = SubscribersResponse),
        (status = 401, description = "Missing or wrong token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("admin_token" = [])),
    tag = "Admin"
)]
pub async fn list_subscribers(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<SubscribersResponse>, ApiError> {
    authorize(&state, query.token.as_deref())?;

    let subscribers = AdminService::list_subscribers(&state.db).await?;

    Ok(Json(SubscribersResponse {
        success: true,
        subscribers: subscribers.into_iter().map(Into::into).collect(),
    }))
}

/// List waitlist entries by slot
#[utoipa::path(
    get,
    path = "/api/admin/waitlist",
    params(AdminQuery),
    responses(
        (status = 200, description = "Waitlist entries", body = WaitlistResponse),
        (status = 401, description = "Missing or wrong token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("admin_token" = [])),
    tag = "Admin"
)]
pub async fn list_waitlist(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<WaitlistResponse>, ApiError> {
    authorize(&state, query.token.as_deref())?;

    let entries = AdminService::list_waitlist(&state.db).await?;

    Ok(Json(WaitlistResponse {
        success: true,
        waitlist: entries.into_iter().map(Into::into).collect(),
    }))
}
