use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{get_company_record, is_unique_violation};
use crate::db::DatabaseError;
use crate::models::*;

pub(crate) const DUPLICATE_DOCUMENT: &str = "Pessoa com este documento já existe";

/// SQLite's default host-parameter limit is far above this; chunking keeps
/// the IN lists short regardless of spreadsheet size.
const DOCUMENT_CHUNK: usize = 500;

const VIEW_SELECT: &str = "SELECT p.id, p.nome, p.documento, p.empresa_id, p.setor,
            p.created_at, p.updated_at,
            e.nome, c.id IS NOT NULL, c.pulseira, c.checkin_at
     FROM pessoas p
     JOIN empresas e ON p.empresa_id = e.id
     LEFT JOIN checkins c ON p.id = c.pessoa_id";

fn person_from_row(row: &Row) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        document: row.get(2)?,
        empresa_id: row.get(3)?,
        sector: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub(crate) fn person_view_from_row(row: &Row) -> rusqlite::Result<PersonView> {
    Ok(PersonView {
        person: person_from_row(row)?,
        company_name: row.get(7)?,
        checked_in: row.get(8)?,
        wristband: row.get(9)?,
        checkin_at: row.get(10)?,
    })
}

pub fn list_persons(conn: &Connection) -> Result<Vec<PersonView>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{VIEW_SELECT} ORDER BY p.nome, p.id"))?;
    let rows = stmt.query_map([], person_view_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Persons of one company, ordered by name.
pub fn list_company_persons(conn: &Connection, company_id: i64) -> Result<Vec<PersonView>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{VIEW_SELECT} WHERE p.empresa_id = ?1 ORDER BY p.nome, p.id"
    ))?;
    let rows = stmt.query_map(params![company_id], person_view_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_person(conn: &Connection, id: i64) -> Result<Option<PersonView>, DatabaseError> {
    let view = conn
        .query_row(
            &format!("{VIEW_SELECT} WHERE p.id = ?1"),
            params![id],
            person_view_from_row,
        )
        .optional()?;
    Ok(view)
}

pub fn person_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM pessoas WHERE id = ?1", params![id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

/// Look a person up by exact document, with their standing inside the company.
pub fn find_person_by_document(
    conn: &Connection,
    document: &str,
) -> Result<Option<PersonLookup>, DatabaseError> {
    let view = conn
        .query_row(
            &format!("{VIEW_SELECT} WHERE p.documento = ?1"),
            params![document],
            person_view_from_row,
        )
        .optional()?;
    let Some(view) = view else {
        return Ok(None);
    };

    let company_id = view.person.empresa_id;
    let (company_total, company_checkins): (i64, i64) = conn.query_row(
        "SELECT COUNT(p.id), COUNT(c.id)
         FROM pessoas p
         LEFT JOIN checkins c ON p.id = c.pessoa_id
         WHERE p.empresa_id = ?1",
        params![company_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let company_position: i64 = conn.query_row(
        "SELECT COUNT(*) + 1 FROM pessoas WHERE empresa_id = ?1 AND id < ?2",
        params![company_id, view.person.id],
        |row| row.get(0),
    )?;

    Ok(Some(PersonLookup {
        view,
        company_total,
        company_checkins,
        company_position,
    }))
}

fn ensure_company(conn: &Connection, company_id: i64) -> Result<(), DatabaseError> {
    if get_company_record(conn, company_id)?.is_none() {
        return Err(DatabaseError::constraint("Empresa não encontrada"));
    }
    Ok(())
}

fn map_document_conflict(e: rusqlite::Error) -> DatabaseError {
    if is_unique_violation(&e, "pessoas.documento") {
        DatabaseError::constraint(DUPLICATE_DOCUMENT)
    } else {
        e.into()
    }
}

/// Register a person. The company must exist and the document must be unused.
pub fn insert_person(conn: &Connection, new: &NewPerson) -> Result<Person, DatabaseError> {
    ensure_company(conn, new.company_id)?;
    conn.query_row(
        "INSERT INTO pessoas (nome, documento, setor, empresa_id)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id, nome, documento, empresa_id, setor, created_at, updated_at",
        params![new.name, new.document, new.sector, new.company_id],
        person_from_row,
    )
    .map_err(map_document_conflict)
}

pub fn update_person(conn: &Connection, id: i64, new: &NewPerson) -> Result<Person, DatabaseError> {
    ensure_company(conn, new.company_id)?;
    let updated = conn
        .query_row(
            "UPDATE pessoas
             SET nome = ?1, documento = ?2, setor = ?3, empresa_id = ?4,
                 updated_at = CURRENT_TIMESTAMP
             WHERE id = ?5
             RETURNING id, nome, documento, empresa_id, setor, created_at, updated_at",
            params![new.name, new.document, new.sector, new.company_id, id],
            person_from_row,
        )
        .optional()
        .map_err(map_document_conflict)?;
    updated.ok_or_else(|| DatabaseError::not_found("pessoa", id))
}

/// Delete a person. Refused once they have checked in.
pub fn delete_person(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let checkins: i64 = conn.query_row(
        "SELECT COUNT(*) FROM checkins WHERE pessoa_id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    if checkins > 0 {
        return Err(DatabaseError::constraint(
            "Não é possível deletar pessoa com check-in realizado",
        ));
    }
    let deleted = conn.execute("DELETE FROM pessoas WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("pessoa", id));
    }
    Ok(())
}

/// Which of `documents` are already registered, in query order.
pub fn existing_documents(conn: &Connection, documents: &[String]) -> Result<Vec<String>, DatabaseError> {
    let mut found = Vec::new();
    for chunk in documents.chunks(DOCUMENT_CHUNK) {
        let placeholders = (1..=chunk.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(",");
        let mut stmt = conn.prepare(&format!(
            "SELECT documento FROM pessoas WHERE documento IN ({placeholders})"
        ))?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| row.get::<_, String>(0))?;
        for row in rows {
            found.push(row?);
        }
    }
    Ok(found)
}
