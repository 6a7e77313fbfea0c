use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Company with attendee and check-in counts.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyOverview {
    #[serde(flatten)]
    pub company: Company,
    #[serde(rename = "total_pessoas")]
    pub total_persons: i64,
    pub total_checkins: i64,
}
