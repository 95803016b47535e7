//! Care visit records.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One recorded care visit. `carer_name`/`carer_number` are snapshots of the
/// author taken at creation time; later profile edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitLog {
    pub id: String,
    pub client_id: String,
    pub carer_name: String,
    pub carer_number: Option<String>,
    pub date: DateTime<Utc>,
    pub personal_care_completed: bool,
    pub care_reminders_provided: String,
    pub toilet: bool,
    pub changed_clothes: bool,
    pub ate_food: String,
    pub notes: String,
    pub mood: Vec<String>,
    pub last_updated_by: Option<String>,
    pub last_updated_at: Option<DateTime<Utc>>,
}
