//! Report endpoints under `/api/relatorios`.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{
    CompanyDetail, CompanyReportRow, DailyCheckins, Dashboard, ExportRow, SectorReportRow,
};

/// `GET /api/relatorios/dashboard`: totals, last 24h by hour, per-company progress.
pub async fn dashboard(State(ctx): State<ApiContext>) -> Result<Json<Dashboard>, ApiError> {
    let conn = ctx.core.open_db()?;
    // Check-in timestamps are written by SQLite in UTC.
    let now = chrono::Utc::now().naive_utc();
    Ok(Json(repository::dashboard(&conn, now)?))
}

pub async fn companies(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<CompanyReportRow>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::company_report(&conn)?))
}

pub async fn sectors(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<SectorReportRow>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::sector_report(&conn)?))
}

pub async fn company(
    State(ctx): State<ApiContext>,
    ApiPath(company_id): ApiPath<i64>,
) -> Result<Json<CompanyDetail>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::company_detail(&conn, company_id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Empresa não encontrada".into()))
}

#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub inicio: Option<String>,
    pub fim: Option<String>,
}

/// `GET /api/relatorios/periodo?inicio=&fim=`: check-ins per day, both bounds inclusive.
pub async fn period(
    State(ctx): State<ApiContext>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<DailyCheckins>>, ApiError> {
    let from = parse_bound(query.inicio.as_deref(), Bound::Start)?;
    let to = parse_bound(query.fim.as_deref(), Bound::End)?;
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::checkins_by_period(&conn, from, to)?))
}

/// `GET /api/relatorios/export/csv`: flat rows with display headers.
pub async fn export(State(ctx): State<ApiContext>) -> Result<Json<Vec<ExportRow>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::export_rows(&conn)?))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound {
    Start,
    End,
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a period bound. A bare date covers the whole day on either side.
fn parse_bound(raw: Option<&str>, bound: Bound) -> Result<Option<NaiveDateTime>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(ts));
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Data inválida: {raw}")))?;
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
    };
    Ok(Some(date.and_time(time)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn missing_or_blank_bound_is_open() {
        assert_eq!(parse_bound(None, Bound::Start).unwrap(), None);
        assert_eq!(parse_bound(Some("  "), Bound::End).unwrap(), None);
    }

    #[test]
    fn date_only_bounds_cover_whole_day() {
        assert_eq!(
            parse_bound(Some("2024-03-10"), Bound::Start).unwrap(),
            Some(ts("2024-03-10 00:00:00"))
        );
        assert_eq!(
            parse_bound(Some("2024-03-10"), Bound::End).unwrap(),
            Some(ts("2024-03-10 23:59:59"))
        );
    }

    #[test]
    fn datetime_bounds_kept_as_given() {
        assert_eq!(
            parse_bound(Some("2024-03-10T08:30"), Bound::End).unwrap(),
            Some(ts("2024-03-10 08:30:00"))
        );
        assert_eq!(
            parse_bound(Some("2024-03-10 08:30:15"), Bound::Start).unwrap(),
            Some(ts("2024-03-10 08:30:15"))
        );
    }

    #[test]
    fn garbage_bound_rejected() {
        let err = parse_bound(Some("ontem"), Bound::Start).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.contains("ontem")));
    }
}
