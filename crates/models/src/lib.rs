pub mod contact;
pub mod listing;
pub mod party_size;
pub mod request;
pub mod slot;
pub mod table_policy;
pub mod validation;
