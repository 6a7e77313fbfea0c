use serde::Serialize;

use super::OcrError;

/// Raw OCR result for one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrPage {
    pub text: String,
    /// Mean recognition confidence, 0.0–1.0.
    pub confidence: f32,
}

/// Text recognition abstraction.
///
/// Implementations are shared across request handlers, hence `Send + Sync`.
/// `recognize` blocks; async callers run it on a blocking thread.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<OcrPage, OcrError>;
}
