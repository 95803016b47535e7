//! Shift schedule domain entity.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::domain::error::CareError;

/// Schedule lifecycle status.
///
/// Legal transitions: scheduled moves to in_progress or cancelled,
/// in_progress moves to completed or cancelled. Completed and cancelled are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl ScheduleStatus {
    pub const ALL: [ScheduleStatus; 4] = [
        Self::Scheduled,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Active statuses take part in conflict detection.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Scheduled | Self::InProgress)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: ScheduleStatus) -> bool {
        match self {
            Self::Scheduled => matches!(next, Self::InProgress | Self::Cancelled),
            Self::InProgress => matches!(next, Self::Completed | Self::Cancelled),
            Self::Completed | Self::Cancelled => false,
        }
    }

    /// Statuses reachable from here, for error messages.
    pub fn allowed_transitions(&self) -> &'static [ScheduleStatus] {
        match self {
            Self::Scheduled => &[Self::InProgress, Self::Cancelled],
            Self::InProgress => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScheduleStatus {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CareError::Validation(format!(
                "unknown schedule status '{other}', expected one of: \
                 scheduled, in_progress, completed, cancelled"
            ))),
        }
    }
}

/// One shift booking a carer against a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub id: String,
    pub carer_email: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub shift_type: String,
    pub status: ScheduleStatus,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, when the status reaches completed.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Schedule {
    /// Half-open overlap test: a window touching this schedule's boundary
    /// does not count as a clash.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.end_time && end > self.start_time
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

// ── Tests ──────────────────────────────────────────────────────
