//! Care-home residents ("clients").

use chrono::NaiveDate;

/// Full resident record, visible to management roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub room: String,
    pub date_of_birth: NaiveDate,
    pub support_needs: Option<String>,
}

/// Demographic subset shown to assigned carers and family members. Care
/// plans (`support_needs`) stay management-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSummary {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub room: String,
    pub date_of_birth: NaiveDate,
}

/// What a caller is allowed to see for one resident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientView {
    Full(Client),
    Limited(ClientSummary),
}

impl Client {
    pub fn summary(&self) -> ClientSummary {
        ClientSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            age: self.age,
            room: self.room.clone(),
            date_of_birth: self.date_of_birth,
        }
    }
}
