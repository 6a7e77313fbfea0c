use chrono::{Duration, NaiveDateTime};
use rusqlite::{params, Connection};

use super::{format_timestamp, get_company_record, list_company_persons, percentage, NO_SECTOR};
use crate::db::DatabaseError;
use crate::models::*;

const RECENT_LIMIT: i64 = 10;

/// Display layout of the export's check-in timestamp.
const EXPORT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

// ═══════════════════════════════════════════
// Dashboard
// ═══════════════════════════════════════════

/// Event overview. `now` bounds the 24-hour window of the hourly histogram.
pub fn dashboard(conn: &Connection, now: NaiveDateTime) -> Result<Dashboard, DatabaseError> {
    let totals = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM empresas),
                (SELECT COUNT(*) FROM pessoas),
                (SELECT COUNT(*) FROM checkins),
                (SELECT COUNT(DISTINCT pessoa_id) FROM checkins)",
        [],
        |row| {
            Ok(DashboardTotals {
                companies: row.get(0)?,
                persons: row.get(1)?,
                checkins: row.get(2)?,
                persons_checked_in: row.get(3)?,
            })
        },
    )?;

    let since = format_timestamp(&(now - Duration::hours(24)));
    let mut stmt = conn.prepare(
        "SELECT CAST(strftime('%H', checkin_at) AS INTEGER) AS hora, COUNT(*)
         FROM checkins
         WHERE checkin_at >= ?1
         GROUP BY hora
         ORDER BY hora",
    )?;
    let by_hour = stmt
        .query_map(params![since], |row| {
            Ok(HourlyCount {
                hour: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT e.nome, COUNT(DISTINCT p.id), COUNT(DISTINCT c.id) AS total_checkins
         FROM empresas e
         LEFT JOIN pessoas p ON e.id = p.empresa_id
         LEFT JOIN checkins c ON p.id = c.pessoa_id
         GROUP BY e.id
         ORDER BY total_checkins DESC, e.nome",
    )?;
    let by_company = stmt
        .query_map([], |row| {
            let persons: i64 = row.get(1)?;
            let checkins: i64 = row.get(2)?;
            Ok(CompanyProgress {
                company: row.get(0)?,
                persons,
                checkins,
                percentage: percentage(checkins, persons),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT c.checkin_at, p.nome, p.documento, e.nome, c.pulseira
         FROM checkins c
         JOIN pessoas p ON c.pessoa_id = p.id
         JOIN empresas e ON p.empresa_id = e.id
         ORDER BY c.checkin_at DESC, c.id DESC
         LIMIT ?1",
    )?;
    let recent = stmt
        .query_map(params![RECENT_LIMIT], |row| {
            Ok(RecentCheckin {
                checkin_at: row.get(0)?,
                person_name: row.get(1)?,
                document: row.get(2)?,
                company_name: row.get(3)?,
                wristband: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dashboard {
        totals,
        by_hour,
        by_company,
        recent,
    })
}

// ═══════════════════════════════════════════
// Breakdowns
// ═══════════════════════════════════════════

pub fn company_report(conn: &Connection) -> Result<Vec<CompanyReportRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT e.id, e.nome,
                COUNT(DISTINCT p.id),
                COUNT(DISTINCT c.id) AS total_checkins,
                COUNT(DISTINCT p.setor),
                MIN(c.checkin_at),
                MAX(c.checkin_at)
         FROM empresas e
         LEFT JOIN pessoas p ON e.id = p.empresa_id
         LEFT JOIN checkins c ON p.id = c.pessoa_id
         GROUP BY e.id
         ORDER BY total_checkins DESC, e.nome",
    )?;
    let rows = stmt.query_map([], |row| {
        let persons: i64 = row.get(2)?;
        let checkins: i64 = row.get(3)?;
        Ok(CompanyReportRow {
            id: row.get(0)?,
            company: row.get(1)?,
            persons,
            checkins,
            sectors: row.get(4)?,
            percentage: percentage(checkins, persons),
            first_checkin: row.get(5)?,
            last_checkin: row.get(6)?,
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Per-sector breakdown. Persons without a sector are grouped under
/// [`NO_SECTOR`].
pub fn sector_report(conn: &Connection) -> Result<Vec<SectorReportRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT COALESCE(p.setor, ?1) AS setor_nome,
                COUNT(DISTINCT p.id),
                COUNT(DISTINCT c.id) AS total_checkins,
                COUNT(DISTINCT p.empresa_id)
         FROM pessoas p
         LEFT JOIN checkins c ON p.id = c.pessoa_id
         GROUP BY p.setor
         ORDER BY total_checkins DESC, setor_nome",
    )?;
    let rows = stmt.query_map(params![NO_SECTOR], |row| {
        let persons: i64 = row.get(1)?;
        let checkins: i64 = row.get(2)?;
        Ok(SectorReportRow {
            sector: row.get(0)?,
            persons,
            checkins,
            companies: row.get(3)?,
            percentage: percentage(checkins, persons),
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// One company with its attendees and per-sector counts. `None` when the
/// company does not exist.
pub fn company_detail(conn: &Connection, company_id: i64) -> Result<Option<CompanyDetail>, DatabaseError> {
    let Some(company) = get_company_record(conn, company_id)? else {
        return Ok(None);
    };
    let persons = list_company_persons(conn, company_id)?;

    let mut stmt = conn.prepare(
        "SELECT COALESCE(p.setor, ?2) AS setor_nome,
                COUNT(DISTINCT p.id),
                COUNT(DISTINCT c.id) AS total_checkins
         FROM pessoas p
         LEFT JOIN checkins c ON p.id = c.pessoa_id
         WHERE p.empresa_id = ?1
         GROUP BY p.setor
         ORDER BY total_checkins DESC, setor_nome",
    )?;
    let sectors = stmt
        .query_map(params![company_id, NO_SECTOR], |row| {
            Ok(SectorCount {
                sector: row.get(0)?,
                persons: row.get(1)?,
                checkins: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(CompanyDetail {
        company,
        persons,
        sectors,
    }))
}

/// Check-ins per calendar day, newest day first. Both bounds are inclusive
/// and optional.
pub fn checkins_by_period(
    conn: &Connection,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<Vec<DailyCheckins>, DatabaseError> {
    let start = start.as_ref().map(format_timestamp);
    let end = end.as_ref().map(format_timestamp);
    let mut stmt = conn.prepare(
        "SELECT date(c.checkin_at) AS dia,
                COUNT(*),
                COUNT(DISTINCT p.empresa_id),
                COUNT(DISTINCT p.setor)
         FROM checkins c
         JOIN pessoas p ON c.pessoa_id = p.id
         WHERE (?1 IS NULL OR c.checkin_at >= ?1)
           AND (?2 IS NULL OR c.checkin_at <= ?2)
         GROUP BY dia
         ORDER BY dia DESC",
    )?;
    let rows = stmt.query_map(params![start, end], |row| {
        Ok(DailyCheckins {
            date: row.get(0)?,
            total_checkins: row.get(1)?,
            active_companies: row.get(2)?,
            active_sectors: row.get(3)?,
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Every registered person with their check-in state, ordered by company
/// then name.
pub fn export_rows(conn: &Connection) -> Result<Vec<ExportRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.nome, p.documento, p.setor, e.nome, c.id IS NOT NULL, c.pulseira, c.checkin_at
         FROM pessoas p
         JOIN empresas e ON p.empresa_id = e.id
         LEFT JOIN checkins c ON p.id = c.pessoa_id
         ORDER BY e.nome, p.nome, p.id",
    )?;
    let rows = stmt.query_map([], |row| {
        let checked_in: bool = row.get(4)?;
        let checkin_at: Option<NaiveDateTime> = row.get(6)?;
        Ok(ExportRow {
            name: row.get(0)?,
            document: row.get(1)?,
            sector: row.get(2)?,
            company: row.get(3)?,
            checked_in: if checked_in { "Sim" } else { "Não" },
            wristband: row.get(5)?,
            checkin_at: checkin_at.map(|ts| ts.format(EXPORT_TIMESTAMP_FORMAT).to_string()),
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{insert_checkin, insert_company, insert_person};
    use crate::db::sqlite::open_memory_database;
    use chrono::NaiveDate;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn add_person(conn: &Connection, name: &str, document: &str, sector: Option<&str>, company_id: i64) -> i64 {
        insert_person(
            conn,
            &NewPerson {
                name: name.into(),
                document: document.into(),
                sector: sector.map(String::from),
                company_id,
            },
        )
        .unwrap()
        .id
    }

    fn check_in_at(conn: &Connection, person_id: i64, wristband: &str, when: &str) {
        let view = insert_checkin(conn, person_id, wristband).unwrap();
        conn.execute(
            "UPDATE checkins SET checkin_at = ?1 WHERE id = ?2",
            params![when, view.checkin.id],
        )
        .unwrap();
    }

    /// Acme: Ana (TI, in), Bia (TI), Caio (no sector, in). Beta: Duda (RH).
    fn populated() -> Connection {
        let conn = open_memory_database().unwrap();
        let acme = insert_company(&conn, "Acme").unwrap().id;
        let beta = insert_company(&conn, "Beta").unwrap().id;
        let ana = add_person(&conn, "Ana", "111", Some("TI"), acme);
        add_person(&conn, "Bia", "222", Some("TI"), acme);
        let caio = add_person(&conn, "Caio", "333", None, acme);
        add_person(&conn, "Duda", "444", Some("RH"), beta);
        check_in_at(&conn, ana, "P-1", "2024-05-01 08:15:00");
        check_in_at(&conn, caio, "P-2", "2024-05-02 09:30:00");
        conn
    }

    #[test]
    fn dashboard_totals_and_breakdowns() {
        let conn = populated();
        let dash = dashboard(&conn, at("2024-05-02 12:00:00")).unwrap();

        assert_eq!(
            dash.totals,
            DashboardTotals {
                companies: 2,
                persons: 4,
                checkins: 2,
                persons_checked_in: 2,
            }
        );
        // only the 09:30 check-in falls in the last 24 hours
        assert_eq!(dash.by_hour, vec![HourlyCount { hour: 9, total: 1 }]);
        assert_eq!(dash.by_company[0].company, "Acme");
        assert_eq!(dash.by_company[0].percentage, 66.67);
        assert_eq!(dash.by_company[1].percentage, 0.0);
        assert_eq!(dash.recent.len(), 2);
        assert_eq!(dash.recent[0].wristband, "P-2");
    }

    #[test]
    fn company_report_rows() {
        let conn = populated();
        let rows = company_report(&conn).unwrap();
        assert_eq!(rows.len(), 2);

        let acme = &rows[0];
        assert_eq!(acme.company, "Acme");
        assert_eq!(acme.persons, 3);
        assert_eq!(acme.checkins, 2);
        assert_eq!(acme.sectors, 1);
        assert_eq!(acme.first_checkin, Some(at("2024-05-01 08:15:00")));
        assert_eq!(acme.last_checkin, Some(at("2024-05-02 09:30:00")));

        assert_eq!(rows[1].company, "Beta");
        assert_eq!(rows[1].first_checkin, None);
    }

    #[test]
    fn sector_report_groups_missing_sector() {
        let conn = populated();
        let rows = sector_report(&conn).unwrap();
        let sectors: Vec<&str> = rows.iter().map(|r| r.sector.as_str()).collect();
        assert_eq!(sectors, vec![NO_SECTOR, "TI", "RH"]);

        let ti = &rows[1];
        assert_eq!(ti.persons, 2);
        assert_eq!(ti.checkins, 1);
        assert_eq!(ti.companies, 1);
        assert_eq!(ti.percentage, 50.0);
    }

    #[test]
    fn company_detail_lists_members() {
        let conn = populated();
        let acme = crate::db::repository::find_company_by_name(&conn, "Acme")
            .unwrap()
            .unwrap();
        let detail = company_detail(&conn, acme.id).unwrap().unwrap();
        assert_eq!(detail.company.name, "Acme");
        let names: Vec<&str> = detail.persons.iter().map(|p| p.person.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bia", "Caio"]);
        assert_eq!(detail.sectors.len(), 2);
        assert_eq!(detail.sectors[0].sector, NO_SECTOR);

        assert!(company_detail(&conn, 999).unwrap().is_none());
    }

    #[test]
    fn period_report_respects_bounds() {
        let conn = populated();

        let all = checkins_by_period(&conn, None, None).unwrap();
        let days: Vec<NaiveDate> = all.iter().map(|d| d.date).collect();
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            ]
        );

        let since = checkins_by_period(&conn, Some(at("2024-05-02 00:00:00")), None).unwrap();
        assert_eq!(since.len(), 1);
        assert_eq!(since[0].total_checkins, 1);
        assert_eq!(since[0].active_sectors, 0);

        let until = checkins_by_period(&conn, None, Some(at("2024-05-01 23:59:59"))).unwrap();
        assert_eq!(until.len(), 1);
        assert_eq!(until[0].active_sectors, 1);
    }

    #[test]
    fn export_marks_checkin_state() {
        let conn = populated();
        let rows = export_rows(&conn).unwrap();
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0].name, "Ana");
        assert_eq!(rows[0].checked_in, "Sim");
        assert_eq!(rows[0].checkin_at.as_deref(), Some("01/05/2024 08:15:00"));

        assert_eq!(rows[1].name, "Bia");
        assert_eq!(rows[1].checked_in, "Não");
        assert_eq!(rows[1].wristband, None);

        assert_eq!(rows[3].company, "Beta");

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["Check-in Realizado"], "Sim");
        assert_eq!(json["Pulseira"], "P-1");
    }
}
