use models::{slot::TimeSlot, validation::ValidationError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Failures surfaced by the customer directory and the slot allocator
///
/// A full slot is not an error: it ends in a waitlist entry.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The request was rejected before anything was written
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store could not complete the operation; the transaction was rolled back
    #[error("database error: {0}")]
    Persistence(#[from] DbErr),

    /// Concurrent writers kept claiming the same table
    #[error("gave up booking slot {slot} after {attempts} conflicting attempts")]
    RaceExhausted { slot: TimeSlot, attempts: u32 },
}

impl BookingError {
    /// Whether the caller, rather than the server, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Whether `err` is a unique-constraint violation reported by the store
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_client_error_classification() {
        let validation = BookingError::from(ValidationError::PastTimeSlot);
        assert!(validation.is_client_error());
        assert_eq!(validation.to_string(), "Time slot must be in the future.");

        let persistence = BookingError::from(DbErr::Custom("disk full".to_string()));
        assert!(!persistence.is_client_error());

        let start =
            NaiveDateTime::parse_from_str("2099-01-01 19:00", "%Y-%m-%d %H:%M").unwrap();
        let exhausted = BookingError::RaceExhausted {
            slot: TimeSlot::containing(start),
            attempts: 3,
        };
        assert!(!exhausted.is_client_error());
        assert_eq!(
            exhausted.to_string(),
            "gave up booking slot 2099-01-01T19:00:00 after 3 conflicting attempts"
        );
    }

    #[test]
    fn test_non_constraint_errors_are_not_conflicts() {
        assert!(!is_unique_violation(&DbErr::Custom("boom".to_string())));
        assert!(!is_unique_violation(&DbErr::RecordNotInserted));
    }
}
