pub mod customer;
pub mod reservation;
pub mod waitlist;

pub use customer as customers;
pub use reservation as reservations;
pub use waitlist as waitlist_entries;
