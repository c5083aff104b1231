use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "rx-reconcile";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Documents larger than this are refused before any parsing happens.
pub const MAX_DOCUMENT_BYTES: u64 = 100 * 1024 * 1024; // 100MB

/// Environment variable naming a JSON vocabulary file.
pub const VOCABULARY_ENV: &str = "RX_RECONCILE_VOCABULARY";

/// File name looked up inside the config directory.
pub const VOCABULARY_FILE_NAME: &str = "vocabulary.json";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "rx_reconcile=info,warn"
}

/// Per-user configuration directory, e.g. `~/.config/rx-reconcile/`.
/// `None` when the platform exposes no config location.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Default location of a user-supplied vocabulary file.
pub fn default_vocabulary_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(VOCABULARY_FILE_NAME))
}

/// Vocabulary path taken from [`VOCABULARY_ENV`], ignoring blank values.
pub fn vocabulary_path_from_env() -> Option<PathBuf> {
    std::env::var_os(VOCABULARY_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
