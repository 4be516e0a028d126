use serde::Serialize;
use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Reasons an inbound request is rejected before anything is written
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum ValidationError {
    MissingEmail,
    InvalidEmail,
    InvalidName,
    InvalidPhone,
    PartySizeNotANumber,
    PartySizeOutOfRange(i64),
    MalformedTimeSlot(String),
    PastTimeSlot,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::MissingEmail => write!(f, "Email is required."),
            Self::InvalidEmail => write!(f, "Invalid email format."),
            Self::InvalidName => write!(f, "Name must be at least 2 characters."),
            Self::InvalidPhone => write!(f, "Invalid phone number."),
            Self::PartySizeNotANumber => write!(f, "Party size must be a number."),
            Self::PartySizeOutOfRange(_) => write!(f, "Party size must be between 1 and 12."),
            Self::MalformedTimeSlot(_) => {
                write!(f, "Time slot must be ISO datetime (YYYY-MM-DDTHH:MM).")
            }
            Self::PastTimeSlot => write!(f, "Time slot must be in the future."),
        }
    }
}

impl Error for ValidationError {}
