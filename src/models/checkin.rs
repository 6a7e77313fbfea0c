use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkin {
    pub id: i64,
    pub pessoa_id: i64,
    #[serde(rename = "pulseira")]
    pub wristband: String,
    pub checkin_at: NaiveDateTime,
}

/// Check-in joined with the attendee and their company.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinView {
    #[serde(flatten)]
    pub checkin: Checkin,
    #[serde(rename = "pessoa_nome")]
    pub person_name: String,
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(rename = "setor")]
    pub sector: Option<String>,
    #[serde(rename = "empresa_nome")]
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckinStats {
    pub total_checkins: i64,
    #[serde(rename = "total_pessoas_checkin")]
    pub persons_checked_in: i64,
    #[serde(rename = "total_empresas_checkin")]
    pub companies_checked_in: i64,
    #[serde(rename = "total_pessoas_cadastradas")]
    pub persons_registered: i64,
    #[serde(rename = "total_empresas_cadastradas")]
    pub companies_registered: i64,
    /// Share of registered persons already checked in, 0–100, two decimals.
    #[serde(rename = "percentual_checkin")]
    pub checkin_percentage: f64,
}
