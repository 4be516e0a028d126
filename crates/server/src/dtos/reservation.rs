use chrono::NaiveDateTime;
use database::entities::{customers, reservations};
use models::slot::TimeSlot;
use serde::Serialize;
use utoipa::ToSchema;

/// Message shown when a request lands on the waitlist
pub const WAITLISTED_MESSAGE: &str =
    "This hour is fully booked. You've been added to the waitlist.";

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&customers::Model> for CustomerSummary {
    fn from(customer: &customers::Model) -> Self {
        Self {
            id: customer.id.to_string(),
            name: customer.name.clone(),
            email: customer.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationResponse {
    pub id: String,
    pub table_number: i32,
    pub time_slot: String,
    pub party_size: i32,
    pub customer: Option<CustomerSummary>,
}

impl ReservationResponse {
    pub fn new(reservation: &reservations::Model, customer: Option<&customers::Model>) -> Self {
        Self {
            id: reservation.id.to_string(),
            table_number: reservation.table_number,
            time_slot: iso_slot(reservation.time_slot),
            party_size: reservation.party_size,
            customer: customer.map(CustomerSummary::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmedResponse {
    pub success: bool,
    pub message: String,
    pub reservation: ReservationResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WaitlistedResponse {
    pub success: bool,
    pub error: String,
    pub waitlist: bool,
    pub entry_id: String,
}

/// Formats a stored slot start as ISO-8601
pub fn iso_slot(start: NaiveDateTime) -> String {
    TimeSlot::containing(start).to_string()
}
