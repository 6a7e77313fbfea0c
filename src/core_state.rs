//! Shared application state handed to every request handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::db;
use crate::pipeline::ocr::OcrEngine;

// ═══════════════════════════════════════════════════════════
// CoreState: shared by all axum handlers
// ═══════════════════════════════════════════════════════════

/// Wrapped in `Arc` at startup. Holds no connection: each request opens
/// its own, so handlers never contend on a lock.
pub struct CoreState {
    db_path: PathBuf,
    /// Document OCR. `None` when no engine is configured.
    ocr: Option<Arc<dyn OcrEngine>>,
}

impl CoreState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ocr: None,
        }
    }

    pub fn with_ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(engine);
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a database connection. Migrations are idempotent, so this is
    /// safe on every request.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    /// The configured OCR engine, shared with blocking tasks.
    pub fn ocr_engine(&self) -> Result<Arc<dyn OcrEngine>, CoreError> {
        self.ocr.clone().ok_or(CoreError::OcrUnavailable)
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("OCR engine not configured")]
    OcrUnavailable,
}
