pub mod admin;
pub mod allocation;
pub mod booking;
pub mod customer;
