use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "ARCheckin";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_PORT: u16 = 10000;
const DB_FILENAME: &str = "checkin.db";

/// Upload ceiling for spreadsheets and document photos.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "archeckin=info,archeckin_lib=info,tower_http=info"
}

/// Get the application data directory
/// ~/ARCheckin/ on all platforms. Falls back to the working directory when
/// no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(APP_NAME),
        None => {
            tracing::warn!("Cannot determine home directory, using working directory");
            PathBuf::from(APP_NAME)
        }
    }
}

/// Default location of the SQLite database.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join(DB_FILENAME)
}

/// Runtime settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    /// Allowed browser origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    /// Tesseract data directory. OCR is disabled when unset.
    pub tessdata_dir: Option<PathBuf>,
    pub ocr_lang: String,
}

impl Config {
    /// Read settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Invalid values are logged and
    /// replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match non_empty("ARCHECKIN_PORT").or_else(|| non_empty("PORT")) {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, default = DEFAULT_PORT, "Invalid port, using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let db_path = non_empty("ARCHECKIN_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let cors_origins = non_empty("ARCHECKIN_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let tessdata_dir = non_empty("ARCHECKIN_TESSDATA").map(PathBuf::from);

        let ocr_lang = non_empty("ARCHECKIN_OCR_LANG")
            .unwrap_or_else(|| crate::pipeline::ocr::DEFAULT_OCR_LANG.to_string());

        Self {
            port,
            db_path,
            cors_origins,
            tessdata_dir,
            ocr_lang,
        }
    }
}
