use crate::routes::{admin, health, newsletter, reservation};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "admin_token",
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("token"))),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        reservation::create_reservation,
        newsletter::newsletter_signup,
        admin::list_reservations,
        admin::list_subscribers,
        admin::list_waitlist
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Reservations", description = "Table booking"),
        (name = "Newsletter", description = "Newsletter signup"),
        (name = "Admin", description = "Read-only views for staff"),
    ),
    info(
        title = "Cafe Reservations API",
        version = "1.0.0",
        description = "Table reservations and newsletter signups",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
