//! Bootstrap provisioning: default admin account and demo data.
//!
//! Admin accounts are never creatable through the application services, so
//! the first one is written here during setup. Demo data goes through the
//! repositories, which keeps the audit trail consistent with real usage.

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use tracing::{error, info};

use crate::application::new_entity_id;
use crate::auth::hash_password;
use crate::config::AppConfig;
use crate::domain::audit::AuditEntry;
use crate::domain::client::Client;
use crate::domain::schedule::{Schedule, ScheduleStatus};
use crate::domain::user::User;
use crate::domain::visit_log::VisitLog;
use crate::domain::{CareResult, RepositoryProvider, Role};

/// Actor recorded on provisioning audit entries.
const SETUP_ACTOR: &str = "system";

/// Create the configured admin account if it does not exist yet. Failures
/// are logged, not propagated: a half-provisioned store is still usable and
/// the next run retries.
pub async fn create_default_admin(repos: &dyn RepositoryProvider, cfg: &AppConfig) {
    match repos.users().find_by_email(&cfg.admin.email).await {
        Ok(Some(_)) => return,
        Ok(None) => {}
        Err(e) => {
            error!("Could not check for admin account: {}", e);
            return;
        }
    }

    info!("Creating default admin user...");

    let password_hash = match hash_password(&cfg.admin.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let admin = User {
        email: cfg.admin.email.clone(),
        password_hash,
        role: Role::Admin,
        name: Some(cfg.admin.name.clone()),
        phone: None,
        department: None,
        family_id: None,
    };
    let audit = AuditEntry::created(SETUP_ACTOR, "user", &cfg.admin.email);

    match repos.users().insert(admin, audit).await {
        Ok(()) => {
            info!("Default admin created: {}", cfg.admin.email);
            info!("Please change the admin password immediately!");
        }
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
}

fn staff(email: &str, role: Role, name: &str, password_hash: &str) -> User {
    User {
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role,
        name: Some(name.to_string()),
        phone: None,
        department: None,
        family_id: None,
    }
}

/// Populate an empty store with a small, believable care home: one manager,
/// three carers, two family members, five residents, a week of shifts and a
/// handful of visit records.
pub async fn seed_demo_data(repos: &dyn RepositoryProvider) -> CareResult<()> {
    info!("Seeding demo data...");

    // Every demo account shares one bcrypt hash ("password123").
    let demo_hash = hash_password("password123")
        .map_err(|e| crate::domain::CareError::Store(format!("demo hash failed: {e}")))?;

    let mut manager = staff(
        "manager@carehome.com",
        Role::Manager,
        "Sarah Harrison",
        &demo_hash,
    );
    manager.department = Some("Care Management".to_string());

    let mut carers = vec![
        staff("emily.watson@carehome.com", Role::Carer, "Emily Watson", &demo_hash),
        staff("michael.johnson@carehome.com", Role::Carer, "Michael Johnson", &demo_hash),
        staff("lisa.chen@carehome.com", Role::Carer, "Lisa Chen", &demo_hash),
    ];
    for (carer, phone) in carers.iter_mut().zip(["01234 567 890", "01234 567 891", "01234 567 892"]) {
        carer.phone = Some(phone.to_string());
    }

    let mut family = vec![
        staff("john.smith@family.com", Role::Family, "John Smith", &demo_hash),
        staff("mary.jones@family.com", Role::Family, "Mary Jones", &demo_hash),
    ];
    family[0].phone = Some("07700 123 456".to_string());
    family[0].family_id = Some("FAM001".to_string());
    family[1].phone = Some("07700 123 457".to_string());
    family[1].family_id = Some("FAM002".to_string());

    for user in std::iter::once(manager).chain(carers).chain(family) {
        let audit = AuditEntry::created(SETUP_ACTOR, "user", &user.email);
        repos.users().insert(user, audit).await?;
    }

    let clients = vec![
        Client {
            id: "CL001".to_string(),
            name: "Robert Wilson".to_string(),
            age: 78,
            room: "101A".to_string(),
            date_of_birth: date(1946, 3, 15),
            support_needs: Some(
                "Advanced dementia care. Requires assistance with all daily activities. \
                 Enjoys music therapy. Prefers routine and familiar faces."
                    .to_string(),
            ),
        },
        Client {
            id: "CL002".to_string(),
            name: "Margaret Thompson".to_string(),
            age: 82,
            room: "102B".to_string(),
            date_of_birth: date(1942, 7, 22),
            support_needs: Some(
                "Moderate dementia with sundowning. Independent with eating but needs \
                 encouragement. Can become agitated in the evenings."
                    .to_string(),
            ),
        },
        Client {
            id: "CL003".to_string(),
            name: "James Patterson".to_string(),
            age: 75,
            room: "103A".to_string(),
            date_of_birth: date(1949, 11, 8),
            support_needs: Some(
                "Type 2 diabetes requiring 4x daily blood glucose monitoring. Insulin \
                 dependent. Mobility issues with left leg."
                    .to_string(),
            ),
        },
        Client {
            id: "CL004".to_string(),
            name: "Dorothy Davis".to_string(),
            age: 79,
            room: "104B".to_string(),
            date_of_birth: date(1945, 9, 12),
            support_needs: Some(
                "Post-stroke rehabilitation. Right-side weakness requiring mobility \
                 assistance. Speech therapy exercises twice weekly."
                    .to_string(),
            ),
        },
        Client {
            id: "CL005".to_string(),
            name: "William Miller".to_string(),
            age: 81,
            room: "105A".to_string(),
            date_of_birth: date(1943, 1, 30),
            support_needs: Some(
                "Congestive heart failure. Daily weight monitoring and fluid restriction. \
                 Oxygen therapy at night."
                    .to_string(),
            ),
        },
    ];
    for client in clients {
        let audit = AuditEntry::created(SETUP_ACTOR, "client", &client.id);
        repos.clients().insert(client, audit).await?;
    }

    let edges = [
        ("emily.watson@carehome.com", "CL001"),
        ("emily.watson@carehome.com", "CL002"),
        ("emily.watson@carehome.com", "CL003"),
        ("michael.johnson@carehome.com", "CL004"),
        ("michael.johnson@carehome.com", "CL005"),
        ("lisa.chen@carehome.com", "CL001"),
        ("lisa.chen@carehome.com", "CL005"),
        ("john.smith@family.com", "CL001"),
        ("mary.jones@family.com", "CL002"),
    ];
    for (email, client_id) in edges {
        let edge_id = format!("{email}:{client_id}");
        let audit = AuditEntry::assigned(SETUP_ACTOR, &edge_id);
        repos.assignments().link(email, client_id, audit).await?;
    }

    // A week of completed shifts, today's mixed board and tomorrow's plan.
    let today = Utc::now().date_naive();
    let mut shifts = Vec::new();
    for days_ago in 1..=7 {
        let day = today - Duration::days(days_ago);
        shifts.push(shift(
            "emily.watson@carehome.com",
            "CL001",
            day,
            time(9, 0),
            time(10, 30),
            "morning",
            ScheduleStatus::Completed,
            "Morning dementia care completed successfully",
        ));
        shifts.push(shift(
            "michael.johnson@carehome.com",
            "CL004",
            day,
            time(14, 0),
            time(15, 30),
            "afternoon",
            ScheduleStatus::Completed,
            "Post-stroke physiotherapy and mobility exercises",
        ));
    }
    shifts.push(shift(
        "emily.watson@carehome.com",
        "CL001",
        today,
        time(8, 30),
        time(10, 0),
        "morning",
        ScheduleStatus::InProgress,
        "Morning routine and medication administration",
    ));
    shifts.push(shift(
        "michael.johnson@carehome.com",
        "CL005",
        today,
        time(11, 0),
        time(12, 30),
        "morning",
        ScheduleStatus::Scheduled,
        "Daily weight check and heart medication",
    ));
    shifts.push(shift(
        "lisa.chen@carehome.com",
        "CL001",
        today + Duration::days(1),
        time(19, 0),
        time(20, 0),
        "evening",
        ScheduleStatus::Scheduled,
        "Evening care and bedtime routine",
    ));
    for s in shifts {
        let audit = AuditEntry::created(SETUP_ACTOR, "schedule", &s.id);
        repos.schedules().insert(s, audit).await?;
    }

    let visits = vec![
        visit(
            "CL001",
            "Emily Watson",
            "01234 567 890",
            "Administered morning medications including donepezil.",
            "Full breakfast consumed - porridge with honey, tea with 2 sugars.",
            "Robert was in excellent spirits. Recognized me immediately. Mobility \
             stable, no falls.",
            &["happy", "alert", "cooperative"],
            true,
        ),
        visit(
            "CL003",
            "Michael Johnson",
            "01234 567 891",
            "Blood glucose check: 8.2 mmol/L (target range). Insulin administered.",
            "Diabetic breakfast - controlled carbohydrates.",
            "James is managing his diabetes well. Left leg mobility slightly improved.",
            &["cheerful", "engaged", "independent"],
            false,
        ),
    ];
    for log in visits {
        let audit = AuditEntry::created(SETUP_ACTOR, "visit_log", &log.id);
        repos.visit_logs().insert(log, audit).await?;
    }

    info!("Demo data seeded");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn shift(
    carer_email: &str,
    client_id: &str,
    day: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    shift_type: &str,
    status: ScheduleStatus,
    notes: &str,
) -> Schedule {
    let completed_at = match status {
        ScheduleStatus::Completed => Some(Utc::now()),
        _ => None,
    };
    Schedule {
        id: new_entity_id("SCH"),
        carer_email: carer_email.to_string(),
        client_id: client_id.to_string(),
        date: day,
        start_time: start,
        end_time: end,
        shift_type: shift_type.to_string(),
        status,
        notes: Some(notes.to_string()),
        created_by: SETUP_ACTOR.to_string(),
        created_at: Utc::now(),
        completed_at,
    }
}

#[allow(clippy::too_many_arguments)]
fn visit(
    client_id: &str,
    carer_name: &str,
    carer_number: &str,
    reminders: &str,
    food: &str,
    notes: &str,
    mood: &[&str],
    changed_clothes: bool,
) -> VisitLog {
    VisitLog {
        id: new_entity_id("VL"),
        client_id: client_id.to_string(),
        carer_name: carer_name.to_string(),
        carer_number: Some(carer_number.to_string()),
        date: Utc::now(),
        personal_care_completed: true,
        care_reminders_provided: reminders.to_string(),
        toilet: true,
        changed_clothes,
        ate_food: food.to_string(),
        notes: notes.to_string(),
        mood: mood.iter().map(|m| m.to_string()).collect(),
        last_updated_by: None,
        last_updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryRepositoryProvider;

    #[tokio::test]
    async fn default_admin_is_created_once() {
        let repos = MemoryRepositoryProvider::new();
        let cfg = AppConfig::default();

        create_default_admin(&repos, &cfg).await;
        create_default_admin(&repos, &cfg).await;

        let admin = repos
            .users()
            .find_by_email(&cfg.admin.email)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(repos.audit().recent(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn demo_data_respects_repository_invariants() {
        let repos = MemoryRepositoryProvider::new();
        seed_demo_data(&repos).await.unwrap();

        assert_eq!(repos.clients().list().await.unwrap().len(), 5);
        let team = repos.assignments().users_for_client("CL001").await.unwrap();
        assert_eq!(team.len(), 3);
        assert!(!repos.audit().recent(100).await.unwrap().is_empty());
    }
}
