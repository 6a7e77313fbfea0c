//! Bulk registration from spreadsheets.

pub mod format;
pub mod importer;
pub mod spreadsheet;
pub mod template;
pub mod validate;

pub use format::*;
pub use importer::*;
pub use spreadsheet::*;
pub use template::*;
pub use validate::*;

use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Não foi possível ler a planilha: {0}")]
    Unreadable(String),

    #[error("Planilha está vazia")]
    EmptySheet,

    #[error("Campos obrigatórios ausentes: {}", .missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Spreadsheet generation failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        Self::Unreadable(err.to_string())
    }
}
