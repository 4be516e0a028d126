use crate::{
    contact::{Email, optional_name, parse_name, parse_phone},
    party_size::PartySize,
    slot::TimeSlot,
    validation::ValidationError,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// Inbound reservation request as received from the client
///
/// Missing fields deserialize to empty values so that they are reported by
/// `validate` rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct ReservationRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// ISO-8601 date-time, e.g. `2099-01-01T19:00`
    pub time_slot: String,
    /// Number of guests; an integer or a string holding one
    #[cfg_attr(feature = "openapi", schema(value_type = i64))]
    pub party_size: Value,
}

/// A reservation request whose every field has passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReservation {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub slot: TimeSlot,
    pub party_size: PartySize,
}

impl ReservationRequest {
    /// Validates all fields, failing on the first invalid one
    ///
    /// Fields are checked in the order name, email, phone, party size, time
    /// slot so a client always sees the same error for the same input.
    pub fn validate(&self, now: NaiveDateTime) -> Result<ValidReservation, ValidationError> {
        let name = parse_name(&self.name)?;
        let email = Email::from_str(&self.email)?;
        let phone = parse_phone(self.phone.as_deref())?;
        let party_size = PartySize::try_from(party_size_number(&self.party_size)?)?;
        let slot = TimeSlot::parse(&self.time_slot, now)?;

        Ok(ValidReservation {
            name,
            email,
            phone,
            slot,
            party_size,
        })
    }
}

/// Reads a party size sent either as a JSON integer or as an integer string
fn party_size_number(value: &Value) -> Result<i64, ValidationError> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
    .ok_or(ValidationError::PartySizeNotANumber)
}

/// Inbound newsletter signup
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct NewsletterSignup {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignup {
    pub email: Email,
    pub name: Option<String>,
}

impl NewsletterSignup {
    pub fn validate(&self) -> Result<ValidSignup, ValidationError> {
        Ok(ValidSignup {
            email: Email::from_str(&self.email)?,
            name: optional_name(self.name.as_deref()),
        })
    }
}
