pub mod admin;
pub mod health;
pub mod newsletter;
pub mod reservation;

use crate::{doc::ApiDoc, state::AppState};
use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/reservations", post(reservation::create_reservation))
        .route("/api/newsletter", post(newsletter::newsletter_signup))
        .route("/api/admin/reservations", get(admin::list_reservations))
        .route("/api/admin/newsletter", get(admin::list_subscribers))
        .route("/api/admin/waitlist", get(admin::list_waitlist))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(state)
}
