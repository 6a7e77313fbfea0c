pub mod import;
pub mod ocr;
