//! Flat JSON file storage for timer state and settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::{
    state::Settings,
    timer::{SavedState, Snapshot},
};

pub const TIMER_STATE_FILE: &str = "timerState.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// Read and parse a JSON file; `Ok(None)` when the file does not exist
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    let data = match fs::read_to_string(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };

    let value = serde_json::from_str(&data)
        .with_context(|| format!("Malformed JSON in {}", path.display()))?;
    Ok(Some(value))
}

/// Pretty-print a value to a JSON file, replacing it atomically
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Durable home of the timer snapshot. Failures are logged, never returned.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(TIMER_STATE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved snapshot, treating unreadable files as "nothing saved"
    pub async fn load(&self) -> Option<SavedState> {
        match read_json(&self.path).await {
            Ok(Some(saved)) => {
                debug!("Loaded timer state from {}", self.path.display());
                Some(saved)
            }
            Ok(None) => {
                debug!("No saved timer state at {}", self.path.display());
                None
            }
            Err(e) => {
                warn!("Ignoring saved timer state: {:#}", e);
                None
            }
        }
    }

    pub async fn save(&self, snapshot: &Snapshot) {
        match write_json(&self.path, snapshot).await {
            Ok(()) => debug!("Saved timer state to {}", self.path.display()),
            Err(e) => warn!("Skipping timer state save: {:#}", e),
        }
    }
}

/// Settings file, merged over defaults on load
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SETTINGS_FILE),
        }
    }

    pub async fn load(&self) -> Settings {
        match read_json(&self.path).await {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!("Using default settings: {:#}", e);
                Settings::default()
            }
        }
    }

    pub async fn save(&self, settings: &Settings) -> anyhow::Result<()> {
        write_json(&self.path, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::SettingsPatch, timer::DEFAULT_DURATION_MS};

    fn running_snapshot() -> Snapshot {
        Snapshot {
            duration: 60_000,
            time_remaining: 42_000,
            is_running: true,
            is_paused: false,
            is_completed: false,
            progress: 0.3,
        }
    }

    #[tokio::test]
    async fn missing_state_file_means_no_saved_state() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(StateStore::new(dir.path()).load().await, None);
    }

    #[tokio::test]
    async fn saved_state_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        store.save(&running_snapshot()).await;

        let saved = store.load().await.unwrap();
        assert_eq!(saved, SavedState::from(running_snapshot()));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"timeRemaining\": 42000"));
    }

    #[tokio::test]
    async fn malformed_state_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        std::fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn unwritable_location_skips_save() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let store = StateStore::new(&blocker);
        store.save(&running_snapshot()).await;
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn settings_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());
        assert_eq!(store.load().await, Settings::default());

        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"flashOnComplete": true, "widgetSize": 120}"#,
        )
        .unwrap();
        let mut settings = store.load().await;
        assert!(settings.flash_on_complete);
        assert!(settings.show_timer_display);
        assert_eq!(settings.default_duration, DEFAULT_DURATION_MS);

        settings.merge(SettingsPatch {
            show_timer_display: Some(false),
            ..SettingsPatch::default()
        });
        store.save(&settings).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
        assert!(raw.contains("\"widgetSize\": 120"), "widgetSize dropped: {}", raw);
        assert!(raw.contains("\"showTimerDisplay\": false"));
    }

    #[tokio::test]
    async fn settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested"));
        let settings = Settings {
            default_duration: 90_000,
            ..Settings::default()
        };
        store.save(&settings).await.unwrap();
        assert_eq!(store.load().await, settings);
    }
}
