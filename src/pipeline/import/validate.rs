use std::collections::HashSet;

use rusqlite::Connection;
use serde::Serialize;

use super::{ImportError, Sheet, SheetRow};
use crate::db::repository::existing_documents;

/// Errors returned to the client; the total is reported separately.
pub const MAX_REPORTED_ERRORS: usize = 10;
pub const PREVIEW_ROWS: usize = 5;

/// Dry-run summary of a sheet that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    #[serde(rename = "total_registros")]
    pub total_rows: usize,
    /// Distinct company names in first-seen order.
    #[serde(rename = "empresas_encontradas")]
    pub companies: Vec<String>,
    pub preview: Vec<SheetRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(ValidationReport),
    Invalid {
        /// At most [`MAX_REPORTED_ERRORS`] messages.
        errors: Vec<String>,
        total_errors: usize,
    },
}

/// Check a sheet before importing it, without writing anything.
///
/// Structural problems (empty sheet, missing columns) are returned as
/// `Err`; row-level problems are collected into
/// [`ValidationOutcome::Invalid`].
pub fn validate_sheet(conn: &Connection, sheet: &Sheet) -> Result<ValidationOutcome, ImportError> {
    sheet.ensure_importable()?;

    let mut errors = Vec::new();
    let mut companies: Vec<String> = Vec::new();
    let mut documents: Vec<String> = Vec::new();
    let mut seen = HashSet::new();

    for row in &sheet.rows {
        let line = row.line;
        if row.get("nome").is_none() {
            errors.push(format!("Linha {line}: Nome é obrigatório"));
        }

        match row.get("documento") {
            None => errors.push(format!("Linha {line}: Documento é obrigatório")),
            Some(doc) => {
                if seen.insert(doc.to_string()) {
                    documents.push(doc.to_string());
                } else {
                    errors.push(format!("Linha {line}: Documento {doc} duplicado na planilha"));
                }
            }
        }

        match row.get("empresa") {
            None => errors.push(format!("Linha {line}: Empresa é obrigatória")),
            Some(company) => {
                if !companies.iter().any(|c| c == company) {
                    companies.push(company.to_string());
                }
            }
        }
    }

    for doc in existing_documents(conn, &documents)? {
        errors.push(format!("Documento {doc} já existe no sistema"));
    }

    if !errors.is_empty() {
        let total_errors = errors.len();
        errors.truncate(MAX_REPORTED_ERRORS);
        return Ok(ValidationOutcome::Invalid { errors, total_errors });
    }

    Ok(ValidationOutcome::Valid(ValidationReport {
        total_rows: sheet.rows.len(),
        companies,
        preview: sheet.rows.iter().take(PREVIEW_ROWS).cloned().collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{insert_company, insert_person};
    use crate::db::sqlite::open_memory_database;
    use crate::models::NewPerson;
    use crate::pipeline::import::read_sheet;
    use crate::pipeline::import::spreadsheet::tests::workbook_bytes;

    fn sheet(rows: &[&[&str]]) -> Sheet {
        read_sheet(&workbook_bytes(rows)).unwrap()
    }

    #[test]
    fn valid_sheet_reports_companies_and_preview() {
        let conn = open_memory_database().unwrap();
        let mut rows: Vec<&[&str]> = vec![&["nome", "documento", "empresa", "setor"]];
        rows.push(&["Ana", "111", "Acme", "TI"]);
        rows.push(&["Bia", "222", "Beta", ""]);
        rows.push(&["Caio", "333", "Acme", ""]);
        rows.push(&["Duda", "444", "Gama", ""]);
        rows.push(&["Edu", "555", "Beta", ""]);
        rows.push(&["Fabi", "666", "Acme", ""]);

        let report = match validate_sheet(&conn, &sheet(&rows)).unwrap() {
            ValidationOutcome::Valid(report) => report,
            other => panic!("expected a valid sheet, got {other:?}"),
        };
        assert_eq!(report.total_rows, 6);
        assert_eq!(report.companies, vec!["Acme", "Beta", "Gama"]);
        assert_eq!(report.preview.len(), PREVIEW_ROWS);
        assert_eq!(report.preview[0].get("nome"), Some("Ana"));
    }

    #[test]
    fn row_errors_use_sheet_line_numbers() {
        let conn = open_memory_database().unwrap();
        let outcome = validate_sheet(
            &conn,
            &sheet(&[
                &["nome", "documento", "empresa"],
                &["Ana", "111", "Acme"],
                &["", "111", ""],
                &["Caio", "", "Acme"],
            ]),
        )
        .unwrap();

        assert_eq!(
            outcome,
            ValidationOutcome::Invalid {
                errors: vec![
                    "Linha 3: Nome é obrigatório".to_string(),
                    "Linha 3: Documento 111 duplicado na planilha".to_string(),
                    "Linha 3: Empresa é obrigatória".to_string(),
                    "Linha 4: Documento é obrigatório".to_string(),
                ],
                total_errors: 4,
            }
        );
    }

    #[test]
    fn documents_already_registered_are_reported() {
        let conn = open_memory_database().unwrap();
        let company = insert_company(&conn, "Acme").unwrap();
        insert_person(
            &conn,
            &NewPerson {
                name: "Ana".into(),
                document: "111".into(),
                sector: None,
                company_id: company.id,
            },
        )
        .unwrap();

        let outcome = validate_sheet(
            &conn,
            &sheet(&[&["nome", "documento", "empresa"], &["Ana", "111", "Acme"]]),
        )
        .unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::Invalid {
                errors: vec!["Documento 111 já existe no sistema".to_string()],
                total_errors: 1,
            }
        );
    }

    #[test]
    fn only_first_errors_are_returned() {
        let conn = open_memory_database().unwrap();
        let mut rows: Vec<&[&str]> = vec![&["nome", "documento", "empresa"]];
        for _ in 0..12 {
            rows.push(&["Ana", "111", ""]);
        }
        match validate_sheet(&conn, &sheet(&rows)).unwrap() {
            ValidationOutcome::Invalid { errors, total_errors } => {
                assert_eq!(errors.len(), MAX_REPORTED_ERRORS);
                // 12 missing companies + 11 duplicates
                assert_eq!(total_errors, 23);
            }
            other => panic!("expected errors, got {other:?}"),
        }
    }

    #[test]
    fn structural_problems_are_errors() {
        let conn = open_memory_database().unwrap();
        let empty = sheet(&[&["nome", "documento", "empresa"]]);
        assert!(matches!(validate_sheet(&conn, &empty), Err(ImportError::EmptySheet)));

        let missing = sheet(&[&["nome"], &["Ana"]]);
        assert!(matches!(
            validate_sheet(&conn, &missing),
            Err(ImportError::MissingColumns { .. })
        ));
    }
}
