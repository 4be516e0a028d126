use crate::{
    dtos::{
        ErrorResponse,
        newsletter::NewsletterResponse,
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use database::services::customer::CustomerService;
use models::request::NewsletterSignup;

/// Sign up for the newsletter
///
/// Signing up again with the same email updates the existing customer.
#[utoipa::path(
    post,
    path = "/api/newsletter",
    request_body = NewsletterSignup,
    responses(
        (status = 201, description = "Signed up", body = NewsletterResponse),
        (status = 400, description = "Invalid email or malformed body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Newsletter"
)]
pub async fn newsletter_signup(
    State(state): State<AppState>,
    body: Result<Json<NewsletterSignup>, JsonRejection>,
) -> Result<(StatusCode, Json<NewsletterResponse>), ApiError> {
    let Json(signup) = body?;
    let customer = CustomerService::subscribe(&state.db, &signup).await?;

    Ok((
        StatusCode::CREATED,
        Json(NewsletterResponse {
            success: true,
            message: "Signed up for newsletter.".to_string(),
            customer: customer.into(),
        }),
    ))
}
