use super::types::{OcrEngine, OcrPage};
use super::OcrError;

/// Language used when none is configured.
pub const DEFAULT_OCR_LANG: &str = "por";

/// Bundled Tesseract OCR engine.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct BundledTesseract {
    tessdata_dir: std::path::PathBuf,
    lang: String,
}

#[cfg(feature = "ocr")]
impl BundledTesseract {
    /// Initialize with a tessdata directory and language(s) such as
    /// `"por"` or `"por+eng"`. Every listed language must have its
    /// traineddata file in the directory.
    pub fn new(tessdata_dir: &std::path::Path, lang: &str) -> Result<Self, OcrError> {
        for code in lang.split('+') {
            let traineddata = tessdata_dir.join(format!("{code}.traineddata"));
            if !traineddata.exists() {
                return Err(OcrError::TessdataNotFound(traineddata));
            }
        }
        tracing::info!(tessdata = %tessdata_dir.display(), lang, "Tesseract OCR configured");

        Ok(Self {
            tessdata_dir: tessdata_dir.to_path_buf(),
            lang: lang.to_string(),
        })
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for BundledTesseract {
    fn recognize(&self, image_bytes: &[u8]) -> Result<OcrPage, OcrError> {
        let tessdata_str = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| OcrError::Init("Invalid tessdata path".into()))?;

        let tess = tesseract::Tesseract::new(Some(tessdata_str), Some(&self.lang))
            .map_err(|e| OcrError::Init(format!("{e:?}")))?;

        // Identity cards read best as one uniform block of text.
        let tess = tess
            .set_variable("tessedit_pageseg_mode", "6")
            .and_then(|t| t.set_variable("preserve_interword_spaces", "1"))
            .map_err(|e| OcrError::Config(format!("{e:?}")))?;

        let mut tess = tess
            .set_image_from_mem(image_bytes)
            .map_err(|e| OcrError::Processing(format!("{e:?}")))?;

        let text = tess
            .get_text()
            .map_err(|e| OcrError::Processing(format!("{e:?}")))?;

        let confidence = tess.mean_text_conf().max(0) as f32 / 100.0;

        Ok(OcrPage { text, confidence })
    }
}

/// Mock OCR engine for unit testing without Tesseract.
pub struct MockOcrEngine {
    pub text: String,
    pub confidence: f32,
    pub fail: bool,
}

impl MockOcrEngine {
    pub fn new(text: &str, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            confidence,
            fail: false,
        }
    }

    /// An engine whose every call fails.
    pub fn failing() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            fail: true,
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<OcrPage, OcrError> {
        if self.fail {
            return Err(OcrError::Processing("mock failure".into()));
        }
        Ok(OcrPage {
            text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_ocr_returns_configured_text() {
        let engine = MockOcrEngine::new("CPF 111.444.777-35", 0.92);
        let result = engine.recognize(b"fake_image_bytes").unwrap();
        assert_eq!(result.text, "CPF 111.444.777-35");
        assert!((result.confidence - 0.92).abs() < f32::EPSILON);
    }

    #[test]
    fn failing_mock_reports_processing_error() {
        let engine = MockOcrEngine::failing();
        assert!(matches!(engine.recognize(b"fake"), Err(OcrError::Processing(_))));
    }

    #[test]
    fn engine_is_usable_as_trait_object() {
        let engine: std::sync::Arc<dyn OcrEngine> = std::sync::Arc::new(MockOcrEngine::new("x", 1.0));
        assert_eq!(engine.recognize(b"").unwrap().text, "x");
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn bundled_tesseract_rejects_missing_tessdata() {
        let dir = tempfile::tempdir().unwrap();
        let result = BundledTesseract::new(dir.path(), DEFAULT_OCR_LANG);
        assert!(matches!(result, Err(OcrError::TessdataNotFound(_))));
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn bundled_tesseract_checks_every_language() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("por.traineddata"), b"").unwrap();
        assert!(BundledTesseract::new(dir.path(), "por").is_ok());
        assert!(matches!(
            BundledTesseract::new(dir.path(), "por+eng"),
            Err(OcrError::TessdataNotFound(_))
        ));
    }
}
