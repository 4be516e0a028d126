use super::{
    newsletter::SubscriberResponse,
    reservation::{CustomerSummary, ReservationResponse, iso_slot},
};
use database::services::admin::WaitlistRow;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters of every admin endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AdminQuery {
    /// Shared admin token
    pub token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminReservationsResponse {
    pub success: bool,
    pub reservations: Vec<ReservationResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscribersResponse {
    pub success: bool,
    pub subscribers: Vec<SubscriberResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WaitlistItem {
    pub id: String,
    pub time_slot: String,
    pub customer: Option<CustomerSummary>,
}

impl From<WaitlistRow> for WaitlistItem {
    fn from((entry, customer): WaitlistRow) -> Self {
        Self {
            id: entry.id.to_string(),
            time_slot: iso_slot(entry.time_slot),
            customer: customer.as_ref().map(CustomerSummary::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WaitlistResponse {
    pub success: bool,
    pub waitlist: Vec<WaitlistItem>,
}
