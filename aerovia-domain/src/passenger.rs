use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A passenger record. Independent lifecycle from reservations; deletion
/// rules live in the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Government document id, unique across passengers
    pub document_id: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
}

impl Passenger {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
