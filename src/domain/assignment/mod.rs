mod model;
mod repository;

pub use model::{Assignment, AssignOutcome, CareTeam, CareTeamMember, UnassignOutcome};
pub use repository::AssignmentRepository;
