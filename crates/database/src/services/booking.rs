use crate::{
    entities::customers,
    error::BookingError,
    services::{
        allocation::{Allocation, SlotAllocator},
        customer::{CustomerProfile, CustomerService, ResolveMode},
    },
};
use chrono::Local;
use models::request::ReservationRequest;

/// A processed reservation request
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub customer: customers::Model,
    pub allocation: Allocation,
}

pub struct BookingService;

impl BookingService {
    /// Handles an inbound reservation request end to end
    ///
    /// Every field is validated before the customer is resolved, so an
    /// invalid request leaves the store untouched.
    pub async fn book(
        allocator: &SlotAllocator,
        request: &ReservationRequest,
    ) -> Result<Booking, BookingError> {
        let valid = request.validate(Local::now().naive_local())?;

        let profile = CustomerProfile {
            email: valid.email,
            name: Some(valid.name),
            phone: valid.phone,
        };
        let customer =
            CustomerService::resolve(allocator.db(), &profile, ResolveMode::Reservation).await?;

        let allocation = allocator
            .allocate_slot(&customer, valid.slot, valid.party_size)
            .await?;

        Ok(Booking {
            customer,
            allocation,
        })
    }
}
