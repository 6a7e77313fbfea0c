use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "documento")]
    pub document: String,
    pub empresa_id: i64,
    #[serde(rename = "setor")]
    pub sector: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fields accepted when creating or updating a person.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub name: String,
    pub document: String,
    pub sector: Option<String>,
    pub company_id: i64,
}

/// Person joined with their company name and check-in state.
#[derive(Debug, Clone, Serialize)]
pub struct PersonView {
    #[serde(flatten)]
    pub person: Person,
    #[serde(rename = "empresa_nome")]
    pub company_name: String,
    #[serde(rename = "checkin_realizado")]
    pub checked_in: bool,
    #[serde(rename = "pulseira")]
    pub wristband: Option<String>,
    pub checkin_at: Option<NaiveDateTime>,
}

/// Result of a document lookup at the check-in desk.
#[derive(Debug, Clone, Serialize)]
pub struct PersonLookup {
    #[serde(flatten)]
    pub view: PersonView,
    /// Persons registered for the same company.
    #[serde(rename = "total_empresa")]
    pub company_total: i64,
    /// Persons of the same company already checked in.
    #[serde(rename = "checkins_empresa")]
    pub company_checkins: i64,
    /// 1-based position of this person within the company, by registration order.
    #[serde(rename = "posicao_empresa")]
    pub company_position: i64,
}
