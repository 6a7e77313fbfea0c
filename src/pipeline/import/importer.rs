use rusqlite::Connection;
use serde::Serialize;

use super::{ImportError, Sheet, SheetRow};
use crate::db::repository::{find_or_create_company, insert_person, DUPLICATE_DOCUMENT};
use crate::db::DatabaseError;
use crate::models::NewPerson;

/// Outcome of a bulk import, returned to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    #[serde(rename = "empresas_criadas")]
    pub companies_created: usize,
    #[serde(rename = "pessoas_criadas")]
    pub persons_created: usize,
    #[serde(rename = "total_processados")]
    pub rows_processed: usize,
    /// One `Linha N: ...` message per rejected row.
    pub errors: Vec<String>,
}

/// Register every row of `sheet`, creating companies on first mention.
///
/// A rejected row is reported and skipped; it never aborts the rest of the
/// import. Accepted rows are committed together.
pub fn import_sheet(conn: &Connection, sheet: &Sheet) -> Result<ImportSummary, ImportError> {
    sheet.ensure_importable()?;

    let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;
    let mut summary = ImportSummary {
        rows_processed: sheet.rows.len(),
        ..Default::default()
    };

    for row in &sheet.rows {
        match import_row(&tx, row) {
            Ok(company_created) => {
                summary.persons_created += 1;
                if company_created {
                    summary.companies_created += 1;
                }
            }
            Err(message) => {
                tracing::warn!(line = row.line, error = %message, "Import row rejected");
                summary.errors.push(format!("Linha {}: {message}", row.line));
            }
        }
    }

    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(
        persons = summary.persons_created,
        companies = summary.companies_created,
        rejected = summary.errors.len(),
        "Spreadsheet import finished"
    );
    Ok(summary)
}

/// Insert one row. Returns whether its company was created, or the
/// user-facing reason the row was rejected.
fn import_row(conn: &Connection, row: &SheetRow) -> Result<bool, String> {
    let name = row.get("nome").ok_or("Nome é obrigatório")?;
    let document = row.get("documento").ok_or("Documento é obrigatório")?;
    let company_name = row.get("empresa").ok_or("Empresa é obrigatória")?;

    let (company, created) = find_or_create_company(conn, company_name).map_err(|e| e.to_string())?;
    let new = NewPerson {
        name: name.to_string(),
        document: document.to_string(),
        sector: row.get("setor").map(str::to_string),
        company_id: company.id,
    };

    match insert_person(conn, &new) {
        Ok(_) => Ok(created),
        Err(DatabaseError::ConstraintViolation(m)) if m == DUPLICATE_DOCUMENT => {
            Err(format!("Documento {document} já existe"))
        }
        Err(e) => Err(e.to_string()),
    }
}
