//! Schedule DTOs.

use chrono::{NaiveDate, NaiveTime};

use super::ScheduleStatus;

#[derive(Debug, Clone)]
pub struct CreateScheduleDto {
    pub carer_email: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub shift_type: String,
    pub notes: Option<String>,
}

/// Manager-side edit. Status is deliberately absent: status moves only
/// through the transition rules in `update_status`.
#[derive(Debug, Clone, Default)]
pub struct UpdateScheduleDto {
    pub carer_email: Option<String>,
    pub client_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub shift_type: Option<String>,
    pub notes: Option<String>,
}

impl UpdateScheduleDto {
    pub fn is_empty(&self) -> bool {
        self.carer_email.is_none()
            && self.client_id.is_none()
            && self.date.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.shift_type.is_none()
            && self.notes.is_none()
    }
}

/// Listing filter; all fields optional and AND-combined.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub carer_email: Option<String>,
    pub client_id: Option<String>,
    pub date: Option<NaiveDate>,
    /// Inclusive lower bound, for "upcoming" views.
    pub from_date: Option<NaiveDate>,
    pub status: Option<ScheduleStatus>,
}
