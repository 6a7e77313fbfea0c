use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::{Company, PersonView};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardTotals {
    #[serde(rename = "total_empresas")]
    pub companies: i64,
    #[serde(rename = "total_pessoas")]
    pub persons: i64,
    #[serde(rename = "total_checkins")]
    pub checkins: i64,
    #[serde(rename = "pessoas_com_checkin")]
    pub persons_checked_in: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyCount {
    #[serde(rename = "hora")]
    pub hour: u32,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProgress {
    #[serde(rename = "empresa")]
    pub company: String,
    #[serde(rename = "total_pessoas")]
    pub persons: i64,
    #[serde(rename = "total_checkins")]
    pub checkins: i64,
    #[serde(rename = "percentual_checkin")]
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentCheckin {
    pub checkin_at: NaiveDateTime,
    #[serde(rename = "pessoa_nome")]
    pub person_name: String,
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(rename = "empresa_nome")]
    pub company_name: String,
    #[serde(rename = "pulseira")]
    pub wristband: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    #[serde(rename = "estatisticas")]
    pub totals: DashboardTotals,
    /// Check-ins of the last 24 hours grouped by hour of day.
    #[serde(rename = "checkins_por_hora")]
    pub by_hour: Vec<HourlyCount>,
    #[serde(rename = "checkins_por_empresa")]
    pub by_company: Vec<CompanyProgress>,
    #[serde(rename = "checkins_recentes")]
    pub recent: Vec<RecentCheckin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyReportRow {
    pub id: i64,
    #[serde(rename = "empresa")]
    pub company: String,
    #[serde(rename = "total_pessoas")]
    pub persons: i64,
    #[serde(rename = "total_checkins")]
    pub checkins: i64,
    #[serde(rename = "total_setores")]
    pub sectors: i64,
    #[serde(rename = "percentual_checkin")]
    pub percentage: f64,
    #[serde(rename = "primeiro_checkin")]
    pub first_checkin: Option<NaiveDateTime>,
    #[serde(rename = "ultimo_checkin")]
    pub last_checkin: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorReportRow {
    #[serde(rename = "setor")]
    pub sector: String,
    #[serde(rename = "total_pessoas")]
    pub persons: i64,
    #[serde(rename = "total_checkins")]
    pub checkins: i64,
    #[serde(rename = "total_empresas")]
    pub companies: i64,
    #[serde(rename = "percentual_checkin")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorCount {
    #[serde(rename = "setor")]
    pub sector: String,
    #[serde(rename = "total_pessoas")]
    pub persons: i64,
    #[serde(rename = "total_checkins")]
    pub checkins: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(rename = "empresa")]
    pub company: Company,
    #[serde(rename = "pessoas")]
    pub persons: Vec<PersonView>,
    #[serde(rename = "setores")]
    pub sectors: Vec<SectorCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCheckins {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    pub total_checkins: i64,
    #[serde(rename = "empresas_ativas")]
    pub active_companies: i64,
    #[serde(rename = "setores_ativos")]
    pub active_sectors: i64,
}

/// One attendee line of the export, keyed by the spreadsheet column titles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Nome")]
    pub name: String,
    #[serde(rename = "Documento")]
    pub document: String,
    #[serde(rename = "Setor")]
    pub sector: Option<String>,
    #[serde(rename = "Empresa")]
    pub company: String,
    #[serde(rename = "Check-in Realizado")]
    pub checked_in: &'static str,
    #[serde(rename = "Pulseira")]
    pub wristband: Option<String>,
    #[serde(rename = "Data/Hora Check-in")]
    pub checkin_at: Option<String>,
}
