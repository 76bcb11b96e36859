//! Main application state shared by the HTTP handlers

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{Settings, SettingsPatch};
use crate::{
    services::SettingsStore,
    tasks::{TimerCommand, TimerHandle},
    timer::{DisplayFrame, Snapshot},
};

/// Application state: the timer handle plus settings and server metadata
#[derive(Debug)]
pub struct AppState {
    /// Handle to the engine that owns the timer
    pub timer: TimerHandle,
    /// Current settings and where they are stored
    pub settings: Arc<Mutex<Settings>>,
    pub settings_store: SettingsStore,
    /// `--duration` for this run; never written to the settings file
    pub duration_override: Option<u64>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last command tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        timer: TimerHandle,
        settings: Settings,
        settings_store: SettingsStore,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            timer,
            settings: Arc::new(Mutex::new(settings)),
            settings_store,
            duration_override: None,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Use `duration` instead of the stored default until the process exits
    pub fn with_duration_override(mut self, duration: Option<u64>) -> Self {
        self.duration_override = duration;
        self
    }

    /// Countdown length used by `reset`
    pub fn default_duration(&self) -> Result<u64, String> {
        match self.duration_override {
            Some(duration) => Ok(duration),
            None => Ok(self.get_settings()?.default_duration),
        }
    }

    /// Forward a command to the timer and record it as the last action
    pub async fn command(&self, action: &str, command: TimerCommand) -> Result<Snapshot, String> {
        let snapshot = self.timer.send(command).await?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(snapshot)
    }

    /// Stop and start a fresh countdown of the configured default length
    pub async fn reset(&self) -> Result<Snapshot, String> {
        let duration = self.default_duration()?;
        info!("Resetting timer to default duration {}ms", duration);
        self.command("reset", TimerCommand::Reset(duration)).await
    }

    pub fn get_settings(&self) -> Result<Settings, String> {
        self.settings
            .lock()
            .map(|settings| settings.clone())
            .map_err(|e| format!("Failed to lock settings: {}", e))
    }

    /// Merge a partial update into the settings and persist them.
    /// A failed write keeps the in-memory update.
    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<Settings, String> {
        let updated = {
            let mut settings = self
                .settings
                .lock()
                .map_err(|e| format!("Failed to lock settings: {}", e))?;
            settings.merge(patch);
            settings.clone()
        };

        info!("Settings updated: {:?}", updated);
        if let Err(e) = self.settings_store.save(&updated).await {
            warn!("Failed to save settings: {:#}", e);
        }

        Ok(updated)
    }

    /// Render the latest snapshot with the current display settings
    pub fn display_frame(&self) -> Result<DisplayFrame, String> {
        let options = self.get_settings()?.display_options();
        Ok(DisplayFrame::render(&self.timer.snapshot(), options))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
