use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{is_unique_violation, percentage, person_exists};
use crate::db::DatabaseError;
use crate::models::*;

const ALREADY_CHECKED_IN: &str = "Pessoa já realizou check-in";
const WRISTBAND_IN_USE: &str = "Pulseira já foi utilizada";

const VIEW_SELECT: &str = "SELECT c.id, c.pessoa_id, c.pulseira, c.checkin_at,
            p.nome, p.documento, p.setor, e.nome
     FROM checkins c
     JOIN pessoas p ON c.pessoa_id = p.id
     JOIN empresas e ON p.empresa_id = e.id";

fn checkin_view_from_row(row: &Row) -> rusqlite::Result<CheckinView> {
    Ok(CheckinView {
        checkin: Checkin {
            id: row.get(0)?,
            pessoa_id: row.get(1)?,
            wristband: row.get(2)?,
            checkin_at: row.get(3)?,
        },
        person_name: row.get(4)?,
        document: row.get(5)?,
        sector: row.get(6)?,
        company_name: row.get(7)?,
    })
}

/// All check-ins, newest first.
pub fn list_checkins(conn: &Connection) -> Result<Vec<CheckinView>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{VIEW_SELECT} ORDER BY c.checkin_at DESC, c.id DESC"))?;
    let rows = stmt.query_map([], checkin_view_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_checkin(conn: &Connection, id: i64) -> Result<Option<CheckinView>, DatabaseError> {
    let view = conn
        .query_row(
            &format!("{VIEW_SELECT} WHERE c.id = ?1"),
            params![id],
            checkin_view_from_row,
        )
        .optional()?;
    Ok(view)
}

pub fn list_person_checkins(conn: &Connection, person_id: i64) -> Result<Vec<CheckinView>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{VIEW_SELECT} WHERE c.pessoa_id = ?1 ORDER BY c.checkin_at DESC, c.id DESC"
    ))?;
    let rows = stmt.query_map(params![person_id], checkin_view_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Check a person in with a wristband.
///
/// The person must exist, must not have checked in yet, and the wristband
/// must not be in use. The unique indexes back the explicit checks, so a
/// concurrent writer that slips between them still gets the same message.
pub fn insert_checkin(conn: &Connection, person_id: i64, wristband: &str) -> Result<CheckinView, DatabaseError> {
    if !person_exists(conn, person_id)? {
        return Err(DatabaseError::not_found("pessoa", person_id));
    }

    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM checkins WHERE pessoa_id = ?1",
            params![person_id],
            |row| row.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(DatabaseError::constraint(ALREADY_CHECKED_IN));
    }

    let taken: Option<i64> = conn
        .query_row(
            "SELECT id FROM checkins WHERE pulseira = ?1",
            params![wristband],
            |row| row.get(0),
        )
        .optional()?;
    if taken.is_some() {
        return Err(DatabaseError::constraint(WRISTBAND_IN_USE));
    }

    let id: i64 = conn
        .query_row(
            "INSERT INTO checkins (pessoa_id, pulseira) VALUES (?1, ?2) RETURNING id",
            params![person_id, wristband],
            |row| row.get(0),
        )
        .map_err(|e| {
            if is_unique_violation(&e, "checkins.pulseira") {
                DatabaseError::constraint(WRISTBAND_IN_USE)
            } else if is_unique_violation(&e, "checkins.pessoa_id") {
                DatabaseError::constraint(ALREADY_CHECKED_IN)
            } else {
                e.into()
            }
        })?;

    get_checkin(conn, id)?.ok_or_else(|| DatabaseError::not_found("checkin", id))
}

/// Cancel a check-in.
pub fn delete_checkin(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM checkins WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("checkin", id));
    }
    Ok(())
}

pub fn checkin_stats(conn: &Connection) -> Result<CheckinStats, DatabaseError> {
    let (total_checkins, persons_checked_in, companies_checked_in, persons_registered, companies_registered) =
        conn.query_row(
            "SELECT COUNT(DISTINCT c.id),
                    COUNT(DISTINCT p.id),
                    COUNT(DISTINCT p.empresa_id),
                    (SELECT COUNT(*) FROM pessoas),
                    (SELECT COUNT(*) FROM empresas)
             FROM checkins c
             JOIN pessoas p ON c.pessoa_id = p.id",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            },
        )?;

    Ok(CheckinStats {
        total_checkins,
        persons_checked_in,
        companies_checked_in,
        persons_registered,
        companies_registered,
        checkin_percentage: percentage(persons_checked_in, persons_registered),
    })
}
