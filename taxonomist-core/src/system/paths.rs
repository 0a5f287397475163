use std::path::PathBuf;
use std::sync::OnceLock;

// Cache the paths to avoid repeated environment lookups
static TAXONOMIST_HOME: OnceLock<PathBuf> = OnceLock::new();

/// Generate a UTC timestamp for file names and log lines
/// Returns format: YYYYMMDD_HHMMSS (in UTC timezone)
pub fn generate_utc_timestamp() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Get the Taxonomist home directory
/// Checks TAXONOMIST_HOME environment variable, falls back to ${HOME}/.taxonomist
pub fn taxonomist_home() -> PathBuf {
    TAXONOMIST_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("TAXONOMIST_HOME") {
                PathBuf::from(path)
            } else {
                let home = std::env::var("HOME").unwrap_or_else(|_| {
                    std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string())
                });
                PathBuf::from(home).join(".taxonomist")
            }
        })
        .clone()
}

/// Default config file location
pub fn taxonomist_config_path() -> PathBuf {
    taxonomist_home().join("config.toml")
}

/// Default version log database
pub fn taxonomist_versions_db() -> PathBuf {
    taxonomist_home().join("versions.db")
}

/// Human-readable summary of the resolved locations
pub fn describe_paths() -> String {
    format!(
        "Taxonomist paths:\n  Home:     {}\n  Config:   {}\n  Versions: {}",
        taxonomist_home().display(),
        taxonomist_config_path().display(),
        taxonomist_versions_db().display()
    )
}
