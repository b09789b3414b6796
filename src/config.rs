use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "SkinOAI";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Key under which the full scan list is stored in the key-value store.
/// Matches the key used by earlier releases so on-device history survives upgrades.
pub const SCANS_STORAGE_KEY: &str = "skinAnalysisScans";

/// Number of scans shown on the home screen.
pub const RECENT_SCANS_LIMIT: usize = 4;

/// File name of the on-device history database.
pub const DATABASE_FILE: &str = "history.sqlite3";

/// Prediction API endpoints
pub const PREDICT_ENDPOINT: &str = "/predict";
pub const PING_ENDPOINT: &str = "/ping";
pub const HEALTH_ENDPOINT: &str = "/";

/// Per-request timeout for the prediction API.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Backends tried in order. The last entry is the Android emulator's host alias.
pub const DEFAULT_BACKEND_URLS: &[&str] = &[
    "http://localhost:5000",
    "http://127.0.0.1:5000",
    "http://192.168.0.108:5000",
    "http://10.0.2.2:5000",
];

const DATA_DIR_ENV: &str = "SKINSCAN_DATA_DIR";
const BACKEND_URLS_ENV: &str = "SKINSCAN_BACKEND_URLS";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,skinscan=debug"
}

/// Get the application data directory.
/// `SKINSCAN_DATA_DIR` wins; otherwise ~/SkinOAI/, or ./SkinOAI when no home exists.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the history database path
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// Backend base URLs in the order they should be tried.
pub fn backend_urls() -> Vec<String> {
    parse_backend_urls(std::env::var(BACKEND_URLS_ENV).ok().as_deref())
}

fn parse_backend_urls(raw: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(|url| url.trim().trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .map(String::from)
        .collect();

    if parsed.is_empty() {
        DEFAULT_BACKEND_URLS.iter().map(|url| url.to_string()).collect()
    } else {
        parsed
    }
}
