use crate::validation::ValidationError;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Number of guests in a reservation, always within `MIN..=MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PartySize(i32);

impl PartySize {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 12;

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for PartySize {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            // The range check keeps the narrowing lossless
            Ok(Self(value as i32))
        } else {
            Err(ValidationError::PartySizeOutOfRange(value))
        }
    }
}

impl Display for PartySize {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
