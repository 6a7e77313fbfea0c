//! Brazilian identity documents: validation, classification and
//! extraction from OCR text.
//!
//! Everything here is pure and synchronous. Callers may use it from any
//! thread without coordination.

pub mod classify;
pub mod extraction;
pub mod validators;

pub use classify::DocumentCandidates;
pub use extraction::{analyze_text, extract_fields, DocumentCapture, ExtractedFields};
pub use validators::{digits_only, validate_cnh, validate_cpf, validate_rg};
