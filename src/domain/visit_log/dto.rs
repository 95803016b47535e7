//! Visit log DTOs.

use chrono::{DateTime, Utc};

/// Input for a new visit record. The author snapshot is not part of the
/// input: it is always taken from the authenticated caller.
#[derive(Debug, Clone)]
pub struct CreateVisitLogDto {
    /// Caller-supplied id; collides with an existing record as a
    /// `Validation` error. Generated when absent.
    pub id: Option<String>,
    pub date: DateTime<Utc>,
    pub personal_care_completed: bool,
    pub care_reminders_provided: String,
    pub toilet: bool,
    pub changed_clothes: bool,
    pub ate_food: String,
    pub notes: String,
    pub mood: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateVisitLogDto {
    pub date: Option<DateTime<Utc>>,
    pub personal_care_completed: Option<bool>,
    pub care_reminders_provided: Option<String>,
    pub toilet: Option<bool>,
    pub changed_clothes: Option<bool>,
    pub ate_food: Option<String>,
    pub notes: Option<String>,
    pub mood: Option<Vec<String>>,
}
