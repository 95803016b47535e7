//! In-memory repository provider for development and testing
//!
//! Backs every repository trait with process-local maps. The same audit
//! contract as the database provider applies: mutating trait methods write
//! exactly one trail entry, seed helpers write none.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;

use crate::domain::assignment::{AssignOutcome, AssignmentRepository, UnassignOutcome};
use crate::domain::audit::{AuditEntry, AuditRepository};
use crate::domain::client::{Client, ClientRepository, UpdateClientDto};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::schedule::{
    Schedule, ScheduleFilter, ScheduleRepository, ScheduleStatus, UpdateScheduleDto,
};
use crate::domain::user::{User, UserPatch, UserRepository};
use crate::domain::visit_log::{UpdateVisitLogDto, VisitLog, VisitLogRepository};
use crate::domain::{CareError, CareResult, Role};

/// One struct serves all six repository roles; the provider accessors hand
/// out the same instance behind each trait.
pub struct MemoryRepositoryProvider {
    users: DashMap<String, User>,
    clients: DashMap<String, Client>,
    assignments: DashMap<(String, String), ()>,
    schedules: DashMap<String, Schedule>,
    visit_logs: DashMap<String, VisitLog>,
    /// Keyed by insertion sequence so same-timestamp entries keep their order.
    trail: DashMap<u64, AuditEntry>,
    trail_seq: AtomicU64,
}

impl MemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            clients: DashMap::new(),
            assignments: DashMap::new(),
            schedules: DashMap::new(),
            visit_logs: DashMap::new(),
            trail: DashMap::new(),
            trail_seq: AtomicU64::new(0),
        }
    }

    fn push_trail(&self, entry: AuditEntry) {
        let seq = self.trail_seq.fetch_add(1, Ordering::SeqCst);
        self.trail.insert(seq, entry);
    }

    // ── Seed helpers, bypassing the audit contract ──────────────

    /// Insert an account directly, without a trail entry.
    pub fn seed_user(&self, user: User) {
        self.users.insert(user.email.clone(), user);
    }

    /// Drop an account directly, leaving edges and schedules alone.
    pub fn remove_user(&self, email: &str) {
        self.users.remove(email);
    }

    /// Insert a resident directly, without a trail entry.
    pub fn seed_client(&self, client: Client) {
        self.clients.insert(client.id.clone(), client);
    }

    /// Create an edge directly, without a trail entry.
    pub fn seed_assignment(&self, user_email: &str, client_id: &str) {
        self.assignments
            .insert((user_email.to_string(), client_id.to_string()), ());
    }

    /// Insert a schedule directly, without a trail entry.
    pub fn seed_schedule(&self, schedule: Schedule) {
        self.schedules.insert(schedule.id.clone(), schedule);
    }
}

impl Default for MemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── UserRepository ──────────────────────────────────────────────

#[async_trait]
impl UserRepository for MemoryRepositoryProvider {
    async fn insert(&self, user: User, audit: AuditEntry) -> CareResult<()> {
        if self.users.contains_key(&user.email) {
            return Err(CareError::Validation(format!(
                "user with email '{}' already exists",
                user.email
            )));
        }
        self.users.insert(user.email.clone(), user);
        self.push_trail(audit);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> CareResult<Option<User>> {
        Ok(self.users.get(email).map(|u| u.clone()))
    }

    async fn list_by_role(&self, role: Role) -> CareResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|u| u.role == role)
            .map(|u| u.clone())
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn update(&self, email: &str, patch: UserPatch, audit: AuditEntry) -> CareResult<User> {
        let updated = {
            let Some(mut user) = self.users.get_mut(email) else {
                return Err(CareError::not_found("user", "email", email));
            };
            if let Some(name) = patch.name {
                user.name = Some(name);
            }
            if let Some(phone) = patch.phone {
                user.phone = Some(phone);
            }
            if let Some(department) = patch.department {
                user.department = Some(department);
            }
            if let Some(family_id) = patch.family_id {
                user.family_id = Some(family_id);
            }
            if let Some(password_hash) = patch.password_hash {
                user.password_hash = password_hash;
            }
            user.clone()
        };
        self.push_trail(audit);
        Ok(updated)
    }

    async fn delete_cascading(&self, email: &str, audit: AuditEntry) -> CareResult<Vec<String>> {
        if self.users.remove(email).is_none() {
            return Err(CareError::not_found("user", "email", email));
        }

        let edges: Vec<(String, String)> = self
            .assignments
            .iter()
            .map(|e| e.key().clone())
            .filter(|(u, _)| u == email)
            .collect();
        let client_ids: Vec<String> = edges.iter().map(|(_, c)| c.clone()).collect();
        for key in edges {
            self.assignments.remove(&key);
        }

        let owned: Vec<String> = self
            .schedules
            .iter()
            .filter(|s| s.carer_email == email)
            .map(|s| s.id.clone())
            .collect();
        for id in owned {
            self.schedules.remove(&id);
        }

        self.push_trail(audit);
        Ok(client_ids)
    }
}

// ── ClientRepository ────────────────────────────────────────────

#[async_trait]
impl ClientRepository for MemoryRepositoryProvider {
    async fn insert(&self, client: Client, audit: AuditEntry) -> CareResult<()> {
        if self.clients.contains_key(&client.id) {
            return Err(CareError::Validation(format!(
                "client '{}' already exists",
                client.id
            )));
        }
        self.clients.insert(client.id.clone(), client);
        self.push_trail(audit);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> CareResult<Option<Client>> {
        Ok(self.clients.get(id).map(|c| c.clone()))
    }

    async fn exists(&self, id: &str) -> CareResult<bool> {
        Ok(self.clients.contains_key(id))
    }

    async fn list(&self) -> CareResult<Vec<Client>> {
        let mut clients: Vec<Client> = self.clients.iter().map(|c| c.clone()).collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clients)
    }

    async fn update(
        &self,
        id: &str,
        dto: UpdateClientDto,
        audit: AuditEntry,
    ) -> CareResult<Client> {
        let updated = {
            let Some(mut client) = self.clients.get_mut(id) else {
                return Err(CareError::not_found("client", "id", id));
            };
            if let Some(name) = dto.name {
                client.name = name;
            }
            if let Some(age) = dto.age {
                client.age = age;
            }
            if let Some(room) = dto.room {
                client.room = room;
            }
            if let Some(date_of_birth) = dto.date_of_birth {
                client.date_of_birth = date_of_birth;
            }
            if let Some(support_needs) = dto.support_needs {
                client.support_needs = Some(support_needs);
            }
            client.clone()
        };
        self.push_trail(audit);
        Ok(updated)
    }

    async fn delete_cascading(&self, id: &str, audit: AuditEntry) -> CareResult<()> {
        if self.clients.remove(id).is_none() {
            return Err(CareError::not_found("client", "id", id));
        }

        let edges: Vec<(String, String)> = self
            .assignments
            .iter()
            .map(|e| e.key().clone())
            .filter(|(_, c)| c == id)
            .collect();
        for key in edges {
            self.assignments.remove(&key);
        }

        let schedules: Vec<String> = self
            .schedules
            .iter()
            .filter(|s| s.client_id == id)
            .map(|s| s.id.clone())
            .collect();
        for sid in schedules {
            self.schedules.remove(&sid);
        }

        let logs: Vec<String> = self
            .visit_logs
            .iter()
            .filter(|l| l.client_id == id)
            .map(|l| l.id.clone())
            .collect();
        for lid in logs {
            self.visit_logs.remove(&lid);
        }

        self.push_trail(audit);
        Ok(())
    }
}

// ── AssignmentRepository ────────────────────────────────────────

#[async_trait]
impl AssignmentRepository for MemoryRepositoryProvider {
    async fn link(
        &self,
        user_email: &str,
        client_id: &str,
        audit: AuditEntry,
    ) -> CareResult<AssignOutcome> {
        let key = (user_email.to_string(), client_id.to_string());
        if self.assignments.insert(key, ()).is_some() {
            return Ok(AssignOutcome::AlreadyAssigned);
        }
        self.push_trail(audit);
        Ok(AssignOutcome::Assigned)
    }

    async fn unlink(
        &self,
        user_email: &str,
        client_id: &str,
        audit: AuditEntry,
    ) -> CareResult<UnassignOutcome> {
        let key = (user_email.to_string(), client_id.to_string());
        if self.assignments.remove(&key).is_none() {
            return Ok(UnassignOutcome::NotAssigned);
        }
        self.push_trail(audit);
        Ok(UnassignOutcome::Unassigned)
    }

    async fn client_ids_for(&self, user_email: &str) -> CareResult<HashSet<String>> {
        Ok(self
            .assignments
            .iter()
            .filter(|e| e.key().0 == user_email)
            .map(|e| e.key().1.clone())
            .collect())
    }

    async fn users_for_client(&self, client_id: &str) -> CareResult<Vec<User>> {
        let emails: Vec<String> = self
            .assignments
            .iter()
            .filter(|e| e.key().1 == client_id)
            .map(|e| e.key().0.clone())
            .collect();
        let mut users: Vec<User> = emails
            .iter()
            .filter_map(|email| self.users.get(email).map(|u| u.clone()))
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }
}

// ── ScheduleRepository ──────────────────────────────────────────

#[async_trait]
impl ScheduleRepository for MemoryRepositoryProvider {
    async fn insert(&self, schedule: Schedule, audit: AuditEntry) -> CareResult<()> {
        if self.schedules.contains_key(&schedule.id) {
            return Err(CareError::Validation(format!(
                "schedule '{}' already exists",
                schedule.id
            )));
        }
        self.schedules.insert(schedule.id.clone(), schedule);
        self.push_trail(audit);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> CareResult<Option<Schedule>> {
        Ok(self.schedules.get(id).map(|s| s.clone()))
    }

    async fn find_by_id_for_carer(
        &self,
        id: &str,
        carer_email: &str,
    ) -> CareResult<Option<Schedule>> {
        Ok(self
            .schedules
            .get(id)
            .filter(|s| s.carer_email == carer_email)
            .map(|s| s.clone()))
    }

    async fn find_active_for_carer_date(
        &self,
        carer_email: &str,
        date: NaiveDate,
    ) -> CareResult<Vec<Schedule>> {
        let mut rows: Vec<Schedule> = self
            .schedules
            .iter()
            .filter(|s| s.carer_email == carer_email && s.date == date && s.status.is_active())
            .map(|s| s.clone())
            .collect();
        rows.sort_by_key(|s| s.start_time);
        Ok(rows)
    }

    async fn list(&self, filter: ScheduleFilter) -> CareResult<Vec<Schedule>> {
        let mut rows: Vec<Schedule> = self
            .schedules
            .iter()
            .filter(|s| {
                filter
                    .carer_email
                    .as_ref()
                    .map_or(true, |c| &s.carer_email == c)
                    && filter.client_id.as_ref().map_or(true, |c| &s.client_id == c)
                    && filter.date.map_or(true, |d| s.date == d)
                    && filter.from_date.map_or(true, |d| s.date >= d)
                    && filter.status.map_or(true, |st| s.status == st)
            })
            .map(|s| s.clone())
            .collect();
        rows.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
        Ok(rows)
    }

    async fn update(
        &self,
        id: &str,
        dto: UpdateScheduleDto,
        audit: AuditEntry,
    ) -> CareResult<Schedule> {
        let updated = {
            let Some(mut schedule) = self.schedules.get_mut(id) else {
                return Err(CareError::not_found("schedule", "id", id));
            };
            if let Some(carer_email) = dto.carer_email {
                schedule.carer_email = carer_email;
            }
            if let Some(client_id) = dto.client_id {
                schedule.client_id = client_id;
            }
            if let Some(date) = dto.date {
                schedule.date = date;
            }
            if let Some(start_time) = dto.start_time {
                schedule.start_time = start_time;
            }
            if let Some(end_time) = dto.end_time {
                schedule.end_time = end_time;
            }
            if let Some(shift_type) = dto.shift_type {
                schedule.shift_type = shift_type;
            }
            if let Some(notes) = dto.notes {
                schedule.notes = Some(notes);
            }
            schedule.clone()
        };
        self.push_trail(audit);
        Ok(updated)
    }

    async fn set_status(
        &self,
        id: &str,
        status: ScheduleStatus,
        completed_at: Option<DateTime<Utc>>,
        audit: AuditEntry,
    ) -> CareResult<Schedule> {
        let updated = {
            let Some(mut schedule) = self.schedules.get_mut(id) else {
                return Err(CareError::not_found("schedule", "id", id));
            };
            schedule.status = status;
            if let Some(ts) = completed_at {
                schedule.completed_at = Some(ts);
            }
            schedule.clone()
        };
        self.push_trail(audit);
        Ok(updated)
    }

    async fn delete(&self, id: &str, audit: AuditEntry) -> CareResult<()> {
        if self.schedules.remove(id).is_none() {
            return Err(CareError::not_found("schedule", "id", id));
        }
        self.push_trail(audit);
        Ok(())
    }
}

// ── VisitLogRepository ──────────────────────────────────────────

#[async_trait]
impl VisitLogRepository for MemoryRepositoryProvider {
    async fn insert(&self, log: VisitLog, audit: AuditEntry) -> CareResult<()> {
        if self.visit_logs.contains_key(&log.id) {
            return Err(CareError::Validation(format!(
                "visit log '{}' already exists",
                log.id
            )));
        }
        self.visit_logs.insert(log.id.clone(), log);
        self.push_trail(audit);
        Ok(())
    }

    async fn exists(&self, id: &str) -> CareResult<bool> {
        Ok(self.visit_logs.contains_key(id))
    }

    async fn find(&self, client_id: &str, log_id: &str) -> CareResult<Option<VisitLog>> {
        Ok(self
            .visit_logs
            .get(log_id)
            .filter(|l| l.client_id == client_id)
            .map(|l| l.clone()))
    }

    async fn list_for_client(&self, client_id: &str) -> CareResult<Vec<VisitLog>> {
        let mut rows: Vec<VisitLog> = self
            .visit_logs
            .iter()
            .filter(|l| l.client_id == client_id)
            .map(|l| l.clone())
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn update(
        &self,
        client_id: &str,
        log_id: &str,
        dto: UpdateVisitLogDto,
        audit: AuditEntry,
    ) -> CareResult<VisitLog> {
        let updated = {
            let Some(mut log) = self
                .visit_logs
                .get_mut(log_id)
                .filter(|l| l.client_id == client_id)
            else {
                return Err(CareError::not_found("visit log", "id", log_id));
            };
            if let Some(date) = dto.date {
                log.date = date;
            }
            if let Some(personal_care_completed) = dto.personal_care_completed {
                log.personal_care_completed = personal_care_completed;
            }
            if let Some(care_reminders_provided) = dto.care_reminders_provided {
                log.care_reminders_provided = care_reminders_provided;
            }
            if let Some(toilet) = dto.toilet {
                log.toilet = toilet;
            }
            if let Some(changed_clothes) = dto.changed_clothes {
                log.changed_clothes = changed_clothes;
            }
            if let Some(ate_food) = dto.ate_food {
                log.ate_food = ate_food;
            }
            if let Some(notes) = dto.notes {
                log.notes = notes;
            }
            if let Some(mood) = dto.mood {
                log.mood = mood;
            }
            log.last_updated_by = Some(audit.actor.clone());
            log.last_updated_at = Some(audit.timestamp);
            log.clone()
        };
        self.push_trail(audit);
        Ok(updated)
    }

    async fn delete(
        &self,
        client_id: &str,
        log_id: &str,
        audit: AuditEntry,
    ) -> CareResult<VisitLog> {
        let matches_client = self
            .visit_logs
            .get(log_id)
            .map(|l| l.client_id == client_id)
            .unwrap_or(false);
        if !matches_client {
            return Err(CareError::not_found("visit log", "id", log_id));
        }
        let Some((_, removed)) = self.visit_logs.remove(log_id) else {
            return Err(CareError::not_found("visit log", "id", log_id));
        };
        self.push_trail(audit);
        Ok(removed)
    }
}

// ── AuditRepository ─────────────────────────────────────────────

#[async_trait]
impl AuditRepository for MemoryRepositoryProvider {
    async fn append(&self, entry: AuditEntry) -> CareResult<()> {
        self.push_trail(entry);
        Ok(())
    }

    async fn recent(&self, limit: u64) -> CareResult<Vec<AuditEntry>> {
        let mut keyed: Vec<(u64, AuditEntry)> = self
            .trail
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        keyed.sort_by(|a, b| (b.1.timestamp, b.0).cmp(&(a.1.timestamp, a.0)));
        Ok(keyed
            .into_iter()
            .take(limit as usize)
            .map(|(_, entry)| entry)
            .collect())
    }
}

// ── RepositoryProvider ──────────────────────────────────────────

impl RepositoryProvider for MemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn clients(&self) -> &dyn ClientRepository {
        self
    }

    fn assignments(&self) -> &dyn AssignmentRepository {
        self
    }

    fn schedules(&self) -> &dyn ScheduleRepository {
        self
    }

    fn visit_logs(&self) -> &dyn VisitLogRepository {
        self
    }

    fn audit(&self) -> &dyn AuditRepository {
        self
    }
}
