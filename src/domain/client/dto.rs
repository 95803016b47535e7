//! Client DTOs.

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct CreateClientDto {
    pub name: String,
    pub age: i32,
    pub room: String,
    pub date_of_birth: NaiveDate,
    pub support_needs: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClientDto {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub room: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub support_needs: Option<String>,
}
