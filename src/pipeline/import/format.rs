use std::path::Path;

/// Image formats accepted for document OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

/// Detect an image format from magic bytes (NOT file extensions or the
/// client's declared content type).
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(ImageFormat::Png),
        // GIF87a / GIF89a
        [0x47, 0x49, 0x46, 0x38, b'7' | b'9', 0x61, ..] => Some(ImageFormat::Gif),
        _ => None,
    }
}

/// MIME types browsers send for Excel uploads. `octet-stream` covers
/// clients that do not know the type.
const SPREADSHEET_MIMES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "application/octet-stream",
];

/// Whether an upload looks like an Excel workbook, judged by its declared
/// content type or its file name.
pub fn is_spreadsheet_upload(file_name: Option<&str>, content_type: Option<&str>) -> bool {
    if content_type.is_some_and(|ct| SPREADSHEET_MIMES.contains(&ct)) {
        return true;
    }
    let Some(name) = file_name else {
        return false;
    };
    let ext_ok = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("xls"));
    ext_ok
        && mime_guess::from_path(name)
            .iter_raw()
            .any(|m| SPREADSHEET_MIMES.contains(&m))
}
