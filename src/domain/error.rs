//! Domain error taxonomy.
//!
//! Every fallible operation in the crate returns [`CareResult`]. The variants
//! map one-to-one onto the outcomes callers are expected to distinguish;
//! anything the caller cannot act on (driver faults, connection loss) is
//! collapsed into [`CareError::Store`] with the detail logged server-side.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CareError {
    /// Bad credentials or an expired/malformed token. The message never says
    /// which, so probing for registered emails is not possible.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Authenticated, but role or assignment scope forbids the operation.
    /// Raised before any target lookup so it carries no existence information.
    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Malformed interval, illegal status value or transition, duplicate id
    /// on create, wrong target role.
    #[error("Validation: {0}")]
    Validation(String),

    /// The requested booking overlaps an existing active schedule. Carries
    /// the conflicting window so callers can surface it.
    #[error("Schedule conflict: {carer_email} is already booked {start}-{end} on {date}")]
    ScheduleConflict {
        carer_email: String,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    },

    /// Opaque persistence failure. Display hides the detail; the repository
    /// layer has already logged it.
    #[error("internal storage error")]
    Store(String),
}

impl CareError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }
}

/// Result type for all domain and application operations.
pub type CareResult<T> = Result<T, CareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_display_is_opaque() {
        let err = CareError::Store("connection reset by peer at 10.0.0.3".to_string());
        assert_eq!(err.to_string(), "internal storage error");
    }

    #[test]
    fn conflict_display_names_the_window() {
        let err = CareError::ScheduleConflict {
            carer_email: "carer@carehome.com".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("09:00"));
        assert!(msg.contains("2025-01-10"));
    }
}
