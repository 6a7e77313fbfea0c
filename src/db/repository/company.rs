use rusqlite::{params, Connection, OptionalExtension, Row};

use super::is_unique_violation;
use crate::db::DatabaseError;
use crate::models::*;

const DUPLICATE_NAME: &str = "Empresa com este nome já existe";

const OVERVIEW_SELECT: &str = "SELECT e.id, e.nome, e.created_at, e.updated_at,
            COUNT(DISTINCT p.id), COUNT(DISTINCT c.id)
     FROM empresas e
     LEFT JOIN pessoas p ON e.id = p.empresa_id
     LEFT JOIN checkins c ON p.id = c.pessoa_id";

pub(crate) fn company_from_row(row: &Row, offset: usize) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        created_at: row.get(offset + 2)?,
        updated_at: row.get(offset + 3)?,
    })
}

fn overview_from_row(row: &Row) -> rusqlite::Result<CompanyOverview> {
    Ok(CompanyOverview {
        company: company_from_row(row, 0)?,
        total_persons: row.get(4)?,
        total_checkins: row.get(5)?,
    })
}

/// All companies with their counts, ordered by name.
pub fn list_companies(conn: &Connection) -> Result<Vec<CompanyOverview>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{OVERVIEW_SELECT} GROUP BY e.id ORDER BY e.nome"))?;
    let rows = stmt.query_map([], overview_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_company(conn: &Connection, id: i64) -> Result<Option<CompanyOverview>, DatabaseError> {
    let overview = conn
        .query_row(
            &format!("{OVERVIEW_SELECT} WHERE e.id = ?1 GROUP BY e.id"),
            params![id],
            overview_from_row,
        )
        .optional()?;
    Ok(overview)
}

/// Bare company row, without counts.
pub fn get_company_record(conn: &Connection, id: i64) -> Result<Option<Company>, DatabaseError> {
    let company = conn
        .query_row(
            "SELECT id, nome, created_at, updated_at FROM empresas WHERE id = ?1",
            params![id],
            |row| company_from_row(row, 0),
        )
        .optional()?;
    Ok(company)
}

pub fn find_company_by_name(conn: &Connection, name: &str) -> Result<Option<Company>, DatabaseError> {
    let company = conn
        .query_row(
            "SELECT id, nome, created_at, updated_at FROM empresas WHERE nome = ?1",
            params![name],
            |row| company_from_row(row, 0),
        )
        .optional()?;
    Ok(company)
}

pub fn insert_company(conn: &Connection, name: &str) -> Result<Company, DatabaseError> {
    conn.query_row(
        "INSERT INTO empresas (nome) VALUES (?1)
         RETURNING id, nome, created_at, updated_at",
        params![name],
        |row| company_from_row(row, 0),
    )
    .map_err(|e| {
        if is_unique_violation(&e, "empresas.nome") {
            DatabaseError::constraint(DUPLICATE_NAME)
        } else {
            e.into()
        }
    })
}

pub fn update_company(conn: &Connection, id: i64, name: &str) -> Result<Company, DatabaseError> {
    let updated = conn
        .query_row(
            "UPDATE empresas SET nome = ?1, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?2
             RETURNING id, nome, created_at, updated_at",
            params![name, id],
            |row| company_from_row(row, 0),
        )
        .optional()
        .map_err(|e| {
            if is_unique_violation(&e, "empresas.nome") {
                DatabaseError::constraint(DUPLICATE_NAME)
            } else {
                e.into()
            }
        })?;
    updated.ok_or_else(|| DatabaseError::not_found("empresa", id))
}

/// Delete a company. Refused while persons are registered under it.
pub fn delete_company(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    if count_company_persons(conn, id)? > 0 {
        return Err(DatabaseError::constraint(
            "Não é possível deletar empresa com pessoas cadastradas",
        ));
    }
    let deleted = conn.execute("DELETE FROM empresas WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("empresa", id));
    }
    Ok(())
}

pub fn count_company_persons(conn: &Connection, id: i64) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM pessoas WHERE empresa_id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Return the company with this exact name, creating it when missing.
/// The flag is `true` when the company was created by this call.
pub fn find_or_create_company(conn: &Connection, name: &str) -> Result<(Company, bool), DatabaseError> {
    match find_company_by_name(conn, name)? {
        Some(company) => Ok((company, false)),
        None => Ok((insert_company(conn, name)?, true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn insert_and_get_company() {
        let conn = open_memory_database().unwrap();
        let created = insert_company(&conn, "Acme Ltda").unwrap();
        assert_eq!(created.name, "Acme Ltda");

        let overview = get_company(&conn, created.id).unwrap().unwrap();
        assert_eq!(overview.company, created);
        assert_eq!(overview.total_persons, 0);
        assert_eq!(overview.total_checkins, 0);
    }

    #[test]
    fn duplicate_name_is_a_constraint_violation() {
        let conn = open_memory_database().unwrap();
        insert_company(&conn, "Acme").unwrap();
        let err = insert_company(&conn, "Acme").unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(ref m) if m == DUPLICATE_NAME));
    }

    #[test]
    fn list_is_ordered_by_name() {
        let conn = open_memory_database().unwrap();
        insert_company(&conn, "Zeta").unwrap();
        insert_company(&conn, "Alfa").unwrap();
        let names: Vec<String> = list_companies(&conn)
            .unwrap()
            .into_iter()
            .map(|c| c.company.name)
            .collect();
        assert_eq!(names, vec!["Alfa", "Zeta"]);
    }

    #[test]
    fn update_renames_and_reports_missing() {
        let conn = open_memory_database().unwrap();
        let company = insert_company(&conn, "Old").unwrap();
        let renamed = update_company(&conn, company.id, "New").unwrap();
        assert_eq!(renamed.name, "New");
        assert_eq!(renamed.id, company.id);

        let err = update_company(&conn, 999, "Ghost").unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn update_to_existing_name_rejected() {
        let conn = open_memory_database().unwrap();
        insert_company(&conn, "Acme").unwrap();
        let other = insert_company(&conn, "Other").unwrap();
        let err = update_company(&conn, other.id, "Acme").unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn delete_refused_while_persons_registered() {
        let conn = open_memory_database().unwrap();
        let company = insert_company(&conn, "Acme").unwrap();
        conn.execute(
            "INSERT INTO pessoas (nome, documento, empresa_id) VALUES ('Ana', '1', ?1)",
            params![company.id],
        )
        .unwrap();

        let err = delete_company(&conn, company.id).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
        assert!(get_company_record(&conn, company.id).unwrap().is_some());
    }

    #[test]
    fn delete_empty_company() {
        let conn = open_memory_database().unwrap();
        let company = insert_company(&conn, "Acme").unwrap();
        delete_company(&conn, company.id).unwrap();
        assert!(get_company_record(&conn, company.id).unwrap().is_none());
        assert!(matches!(
            delete_company(&conn, company.id),
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn find_or_create_reuses_existing() {
        let conn = open_memory_database().unwrap();
        let (first, created) = find_or_create_company(&conn, "Acme").unwrap();
        assert!(created);
        let (second, created) = find_or_create_company(&conn, "Acme").unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
    }
}
