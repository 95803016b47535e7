//! Assignment edges: which carers and family members may see which clients.

use crate::domain::identity::Role;
use crate::domain::user::User;

/// One user-to-client edge. At most one exists per pair; the edge is the
/// sole scoping signal for carer and family access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub user_email: String,
    pub client_id: String,
}

impl Assignment {
    /// Stable identifier used in audit entries for this edge.
    pub fn edge_id(user_email: &str, client_id: &str) -> String {
        format!("{user_email}:{client_id}")
    }
}

/// Result of an assign call. Repeats are reported, not errored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned,
    AlreadyAssigned,
}

/// Result of an unassign call. Removing an absent edge is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnassignOutcome {
    Unassigned,
    NotAssigned,
}

/// Contact entry in a client's care team view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareTeamMember {
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub family_id: Option<String>,
}

impl From<&User> for CareTeamMember {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            family_id: user.family_id.clone(),
        }
    }
}

/// Everyone assigned to one client, split by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CareTeam {
    pub carers: Vec<CareTeamMember>,
    pub family: Vec<CareTeamMember>,
}

impl CareTeam {
    /// Split a mixed list of assigned users by role. Management accounts
    /// never sit on assignment edges; any that do are ignored.
    pub fn from_users(users: &[User]) -> Self {
        let mut team = CareTeam::default();
        for user in users {
            match user.role {
                Role::Carer => team.carers.push(user.into()),
                Role::Family => team.family.push(user.into()),
                Role::Admin | Role::Manager => {}
            }
        }
        team
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, role: Role) -> User {
        User {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role,
            name: Some(email.split('@').next().unwrap_or(email).to_string()),
            phone: None,
            department: None,
            family_id: None,
        }
    }

    #[test]
    fn care_team_splits_by_role() {
        let users = vec![
            user("carer1@carehome.com", Role::Carer),
            user("family1@example.com", Role::Family),
            user("carer2@carehome.com", Role::Carer),
        ];
        let team = CareTeam::from_users(&users);
        assert_eq!(team.carers.len(), 2);
        assert_eq!(team.family.len(), 1);
        assert_eq!(team.family[0].email, "family1@example.com");
    }

    #[test]
    fn edge_id_is_pair_scoped() {
        assert_eq!(
            Assignment::edge_id("carer1@carehome.com", "C1A2B3C4"),
            "carer1@carehome.com:C1A2B3C4"
        );
    }
}
