//! Schedule booking and lifecycle.
//!
//! Booking runs conflict detection against the carer's other active
//! schedules on the same date. The check-then-insert window is closed with a
//! per-carer lock held across the scan and the write, so two racing bookings
//! for one carer serialize; this assumes a single writing process per
//! deployment.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::audit::AuditEntry;
use crate::domain::schedule::{
    CreateScheduleDto, Schedule, ScheduleFilter, ScheduleStatus, UpdateScheduleDto,
};
use crate::domain::{CareError, CareResult, Identity, Role, RepositoryProvider};

use super::access::{require_manager, AccessPolicy, ClientScope};
use super::new_entity_id;

pub struct ScheduleService {
    repos: Arc<dyn RepositoryProvider>,
    policy: AccessPolicy,
    carer_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ScheduleService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            policy: AccessPolicy::new(repos.clone()),
            repos,
            carer_locks: DashMap::new(),
        }
    }

    fn booking_lock(&self, carer_email: &str) -> Arc<Mutex<()>> {
        self.carer_locks
            .entry(carer_email.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Book a shift. Manager-only. Overlap uses half-open windows: a shift
    /// starting exactly when another ends is allowed.
    pub async fn create(&self, caller: &Identity, dto: CreateScheduleDto) -> CareResult<Schedule> {
        require_manager(caller)?;

        if dto.start_time >= dto.end_time {
            return Err(CareError::Validation(format!(
                "start time {} must be before end time {}",
                dto.start_time, dto.end_time
            )));
        }

        let Some(carer) = self.repos.users().find_by_email(&dto.carer_email).await? else {
            return Err(CareError::not_found("carer", "email", &dto.carer_email));
        };
        if carer.role != Role::Carer {
            return Err(CareError::not_found("carer", "email", &dto.carer_email));
        }
        if !self.repos.clients().exists(&dto.client_id).await? {
            return Err(CareError::not_found("client", "id", &dto.client_id));
        }

        // Serialize against other bookings for this carer.
        let lock = self.booking_lock(&dto.carer_email);
        let _booked = lock.lock().await;

        let active = self
            .repos
            .schedules()
            .find_active_for_carer_date(&dto.carer_email, dto.date)
            .await?;
        if let Some(clash) = active
            .iter()
            .find(|existing| existing.overlaps(dto.start_time, dto.end_time))
        {
            metrics::counter!("careview_schedule_conflicts_total").increment(1);
            info!(
                carer_email = dto.carer_email.as_str(),
                date = %dto.date,
                existing_id = clash.id.as_str(),
                "schedule conflict rejected"
            );
            return Err(CareError::ScheduleConflict {
                carer_email: dto.carer_email.clone(),
                date: clash.date,
                start: clash.start_time,
                end: clash.end_time,
            });
        }

        let mut id = new_entity_id("SCH");
        while self.repos.schedules().find_by_id(&id).await?.is_some() {
            id = new_entity_id("SCH");
        }

        let schedule = Schedule {
            id: id.clone(),
            carer_email: dto.carer_email,
            client_id: dto.client_id,
            date: dto.date,
            start_time: dto.start_time,
            end_time: dto.end_time,
            shift_type: dto.shift_type,
            status: ScheduleStatus::Scheduled,
            notes: dto.notes,
            created_by: caller.email().to_string(),
            created_at: Utc::now(),
            completed_at: None,
        };

        let audit = AuditEntry::created(caller.email(), "schedule", &id);
        self.repos.schedules().insert(schedule.clone(), audit).await?;

        info!(
            schedule_id = id.as_str(),
            carer_email = schedule.carer_email.as_str(),
            client_id = schedule.client_id.as_str(),
            date = %schedule.date,
            "schedule created"
        );
        Ok(schedule)
    }

    /// Move a schedule through its lifecycle. The owning carer may update
    /// their own schedules; managers and admins may update any. A carer
    /// targeting someone else's schedule gets the same miss as a wrong id.
    pub async fn update_status(
        &self,
        caller: &Identity,
        id: &str,
        next: ScheduleStatus,
    ) -> CareResult<Schedule> {
        let schedule = match caller {
            Identity::Manager { .. } | Identity::Admin { .. } => {
                self.repos.schedules().find_by_id(id).await?
            }
            Identity::Carer { email, .. } => {
                self.repos.schedules().find_by_id_for_carer(id, email).await?
            }
            Identity::Family { .. } => {
                return Err(CareError::Authorization(
                    "family accounts cannot update schedules".to_string(),
                ))
            }
        };
        let Some(schedule) = schedule else {
            return Err(CareError::not_found("schedule", "id", id));
        };

        if !schedule.status.can_transition_to(next) {
            let allowed = schedule.status.allowed_transitions();
            let msg = if allowed.is_empty() {
                format!(
                    "schedule {} is {} which is terminal; no further status changes",
                    id, schedule.status
                )
            } else {
                let names: Vec<&str> = allowed.iter().map(|s| s.as_str()).collect();
                format!(
                    "cannot move schedule {} from {} to {}; allowed: {}",
                    id,
                    schedule.status,
                    next,
                    names.join(", ")
                )
            };
            return Err(CareError::Validation(msg));
        }

        let completed_at = match next {
            ScheduleStatus::Completed => Some(Utc::now()),
            _ => schedule.completed_at,
        };

        let audit = AuditEntry::updated(caller.email(), "schedule", id);
        let updated = self
            .repos
            .schedules()
            .set_status(id, next, completed_at, audit)
            .await?;

        info!(
            schedule_id = id,
            from = %schedule.status,
            to = %next,
            by = caller.email(),
            "schedule status updated"
        );
        Ok(updated)
    }

    /// Manager-side edit of time, carer, client, shift type or notes.
    /// Edits do not re-run conflict detection; only `create` guards
    /// overlaps.
    pub async fn update(
        &self,
        caller: &Identity,
        id: &str,
        dto: UpdateScheduleDto,
    ) -> CareResult<Schedule> {
        require_manager(caller)?;

        if dto.is_empty() {
            return Err(CareError::Validation("no fields to update".to_string()));
        }

        let Some(existing) = self.repos.schedules().find_by_id(id).await? else {
            return Err(CareError::not_found("schedule", "id", id));
        };

        if let Some(carer_email) = &dto.carer_email {
            let Some(carer) = self.repos.users().find_by_email(carer_email).await? else {
                return Err(CareError::not_found("carer", "email", carer_email));
            };
            if carer.role != Role::Carer {
                return Err(CareError::not_found("carer", "email", carer_email));
            }
        }
        if let Some(client_id) = &dto.client_id {
            if !self.repos.clients().exists(client_id).await? {
                return Err(CareError::not_found("client", "id", client_id));
            }
        }

        let start = dto.start_time.unwrap_or(existing.start_time);
        let end = dto.end_time.unwrap_or(existing.end_time);
        if start >= end {
            return Err(CareError::Validation(format!(
                "start time {start} must be before end time {end}"
            )));
        }

        let audit = AuditEntry::updated(caller.email(), "schedule", id);
        let updated = self.repos.schedules().update(id, dto, audit).await?;

        info!(schedule_id = id, by = caller.email(), "schedule updated");
        Ok(updated)
    }

    /// Filtered listing, ascending by (date, start_time). Carers see only
    /// their own rows; family only assigned clients' rows.
    pub async fn list(
        &self,
        caller: &Identity,
        mut filter: ScheduleFilter,
    ) -> CareResult<Vec<Schedule>> {
        match caller {
            Identity::Manager { .. } | Identity::Admin { .. } => {
                self.repos.schedules().list(filter).await
            }
            Identity::Carer { email, .. } => {
                filter.carer_email = Some(email.clone());
                self.repos.schedules().list(filter).await
            }
            Identity::Family { .. } => {
                let scope = self.policy.scope(caller).await?;
                let ClientScope::Assigned(ids) = scope else {
                    // family is never unrestricted
                    return Ok(Vec::new());
                };
                if let Some(client_id) = &filter.client_id {
                    if !ids.contains(client_id) {
                        return Err(CareError::Authorization(
                            "you are not assigned to this client".to_string(),
                        ));
                    }
                    return self.repos.schedules().list(filter).await;
                }
                let mut sorted_ids: Vec<String> = ids.into_iter().collect();
                sorted_ids.sort();
                let mut rows = Vec::new();
                for client_id in sorted_ids {
                    let mut per_client = filter.clone();
                    per_client.client_id = Some(client_id);
                    rows.extend(self.repos.schedules().list(per_client).await?);
                }
                rows.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
                Ok(rows)
            }
        }
    }

    /// Single schedule, under the same visibility rules as `list`.
    pub async fn get(&self, caller: &Identity, id: &str) -> CareResult<Schedule> {
        let found = match caller {
            Identity::Manager { .. } | Identity::Admin { .. } => {
                self.repos.schedules().find_by_id(id).await?
            }
            Identity::Carer { email, .. } => {
                self.repos.schedules().find_by_id_for_carer(id, email).await?
            }
            Identity::Family { .. } => match self.repos.schedules().find_by_id(id).await? {
                Some(schedule) => {
                    let scope = self.policy.scope(caller).await?;
                    scope.permits(&schedule.client_id).then_some(schedule)
                }
                None => None,
            },
        };
        found.ok_or_else(|| CareError::not_found("schedule", "id", id))
    }

    /// Remove a schedule outright. Manager-only; cancellation is the normal
    /// path, deletion is for bookings that should never have existed.
    pub async fn delete(&self, caller: &Identity, id: &str) -> CareResult<()> {
        require_manager(caller)?;

        if self.repos.schedules().find_by_id(id).await?.is_none() {
            return Err(CareError::not_found("schedule", "id", id));
        }

        let audit = AuditEntry::deleted(caller.email(), "schedule", id);
        self.repos.schedules().delete(id, audit).await?;

        info!(schedule_id = id, by = caller.email(), "schedule deleted");
        Ok(())
    }
}
