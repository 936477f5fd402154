//! User settings persisted between runs
//!
//! Two settings exist: the URL the quiz feed is fetched from and the
//! auto-refresh interval. They are stored as JSON at
//! `~/.config/iquiz/settings.json` (or the platform equivalent).

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Feed used when no source URL has been configured
pub const DEFAULT_SOURCE_URL: &str = "https://tednewardsandbox.site44.com/questions.json";

/// Default auto-refresh interval in seconds
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

/// Shortest allowed auto-refresh interval in seconds
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 10;

/// Longest allowed auto-refresh interval in seconds
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 3600;

/// Granularity of the auto-refresh interval in seconds
pub const REFRESH_INTERVAL_STEP_SECS: u64 = 10;

/// Settings file name
const SETTINGS_FILE: &str = "settings.json";

/// Errors that can occur when loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the settings file failed
    #[error("Settings file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The settings file is not valid JSON
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Snaps `secs` to the interval step and clamps it to the allowed range
pub fn normalize_refresh_interval(secs: u64) -> u64 {
    let step = REFRESH_INTERVAL_STEP_SECS;
    let snapped = secs.saturating_add(step / 2) / step * step;
    snapped.clamp(MIN_REFRESH_INTERVAL_SECS, MAX_REFRESH_INTERVAL_SECS)
}

/// The persisted settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// URL of the quiz feed
    pub source_url: String,
    /// Seconds between automatic refreshes
    pub refresh_interval: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl Settings {
    /// The refresh interval as a Duration
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_interval)
    }

    /// Sets the refresh interval, normalized to the allowed range and step
    pub fn set_refresh_interval(&mut self, secs: u64) {
        self.refresh_interval = normalize_refresh_interval(secs);
    }

    /// Increases the refresh interval by one step
    pub fn increment_refresh_interval(&mut self) {
        self.set_refresh_interval(self.refresh_interval + REFRESH_INTERVAL_STEP_SECS);
    }

    /// Decreases the refresh interval by one step
    pub fn decrement_refresh_interval(&mut self) {
        self.set_refresh_interval(
            self.refresh_interval
                .saturating_sub(REFRESH_INTERVAL_STEP_SECS),
        );
    }
}

/// Reads and writes the settings file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a SettingsStore in the platform config directory
    ///
    /// Returns `None` if the config directory cannot be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "iquiz")?;
        Some(Self {
            path: project_dirs.config_dir().join(SETTINGS_FILE),
        })
    }

    /// Creates a SettingsStore backed by a specific file
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the settings file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads settings, falling back to defaults when the file doesn't exist
    pub fn load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&self.path)?;
        let mut settings: Settings = serde_json::from_str(&contents)?;
        settings.refresh_interval = normalize_refresh_interval(settings.refresh_interval);
        Ok(settings)
    }

    /// Writes settings to disk, creating the directory if needed
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (SettingsStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = SettingsStore::with_path(temp_dir.path().join("config").join(SETTINGS_FILE));
        (store, temp_dir)
    }

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(settings.refresh_interval, 60);
        assert_eq!(settings.refresh_period(), Duration::from_secs(60));
    }

    #[test]
    fn test_normalize_refresh_interval_clamps() {
        assert_eq!(normalize_refresh_interval(0), 10);
        assert_eq!(normalize_refresh_interval(5), 10);
        assert_eq!(normalize_refresh_interval(3600), 3600);
        assert_eq!(normalize_refresh_interval(99_999), 3600);
        assert_eq!(normalize_refresh_interval(u64::MAX), 3600);
    }

    #[test]
    fn test_normalize_refresh_interval_snaps_to_step() {
        assert_eq!(normalize_refresh_interval(60), 60);
        assert_eq!(normalize_refresh_interval(64), 60);
        assert_eq!(normalize_refresh_interval(65), 70);
        assert_eq!(normalize_refresh_interval(1234), 1230);
    }

    #[test]
    fn test_step_refresh_interval() {
        let mut settings = Settings::default();

        settings.increment_refresh_interval();
        assert_eq!(settings.refresh_interval, 70);

        settings.decrement_refresh_interval();
        settings.decrement_refresh_interval();
        assert_eq!(settings.refresh_interval, 50);
    }

    #[test]
    fn test_step_refresh_interval_stops_at_bounds() {
        let mut settings = Settings::default();

        settings.set_refresh_interval(10);
        settings.decrement_refresh_interval();
        assert_eq!(settings.refresh_interval, 10);

        settings.set_refresh_interval(3600);
        settings.increment_refresh_interval();
        assert_eq!(settings.refresh_interval, 3600);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let (store, _temp_dir) = create_test_store();

        let settings = store.load().expect("Load should succeed");

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let (store, _temp_dir) = create_test_store();
        let settings = Settings {
            source_url: "https://example.com/quizzes.json".to_string(),
            refresh_interval: 120,
        };

        store.save(&settings).expect("Save should succeed");
        let loaded = store.load().expect("Load should succeed");

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_fills_missing_keys_with_defaults() {
        let (store, _temp_dir) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"refresh_interval": 300}"#).unwrap();

        let settings = store.load().expect("Load should succeed");

        assert_eq!(settings.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(settings.refresh_interval, 300);
    }

    #[test]
    fn test_load_normalizes_out_of_range_interval() {
        let (store, _temp_dir) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"refresh_interval": 1}"#).unwrap();

        let settings = store.load().expect("Load should succeed");

        assert_eq!(settings.refresh_interval, 10);
    }

    #[test]
    fn test_load_invalid_json_is_an_error() {
        let (store, _temp_dir) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();

        let result = store.load();

        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }
}
