//! OCR seam for document photos taken at the check-in desk.

pub mod engine;
pub mod types;

pub use engine::*;
pub use types::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Tessdata not found at: {0}")]
    TessdataNotFound(PathBuf),

    #[error("Tesseract OCR initialization failed: {0}")]
    Init(String),

    #[error("Tesseract OCR configuration error: {0}")]
    Config(String),

    #[error("OCR processing failed: {0}")]
    Processing(String),
}
