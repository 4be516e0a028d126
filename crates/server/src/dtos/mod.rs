pub mod admin;
pub mod newsletter;
pub mod reservation;

use serde::Serialize;
use utoipa::ToSchema;

/// Body of every unsuccessful response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
