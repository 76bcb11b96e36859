//! User settings that shape the default countdown and its display

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::timer::{DisplayOptions, DEFAULT_DURATION_MS};

/// Persisted user settings. Missing keys take their defaults; keys this
/// crate does not know are carried through to the next save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Countdown length used on first run and by `/reset`, in milliseconds
    pub default_duration: u64,
    pub show_timer_display: bool,
    pub flash_on_complete: bool,
    /// Keys owned by other front ends (widget size, shape, ...), kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            show_timer_display: self.show_timer_display,
            flash_on_complete: self.flash_on_complete,
        }
    }

    /// Apply only the fields present in `patch`
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(default_duration) = patch.default_duration {
            self.default_duration = default_duration;
        }
        if let Some(show_timer_display) = patch.show_timer_display {
            self.show_timer_display = show_timer_display;
        }
        if let Some(flash_on_complete) = patch.flash_on_complete {
            self.flash_on_complete = flash_on_complete;
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_duration: DEFAULT_DURATION_MS,
            show_timer_display: true,
            flash_on_complete: false,
            extra: Map::new(),
        }
    }
}

/// Partial settings update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub default_duration: Option<u64>,
    pub show_timer_display: Option<bool>,
    pub flash_on_complete: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_only_touches_given_fields() {
        let mut settings = Settings::default();
        let patch: SettingsPatch = serde_json::from_str(r#"{"flashOnComplete": true}"#).unwrap();
        settings.merge(patch);

        assert!(settings.flash_on_complete);
        assert!(settings.show_timer_display);
        assert_eq!(settings.default_duration, DEFAULT_DURATION_MS);
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let mut settings: Settings =
            serde_json::from_str(r#"{"widgetSize": 120, "shape": "circle", "defaultDuration": 60000}"#)
                .unwrap();
        assert_eq!(settings.default_duration, 60_000);
        assert_eq!(settings.extra.get("widgetSize"), Some(&Value::from(120)));

        settings.merge(SettingsPatch {
            flash_on_complete: Some(true),
            ..SettingsPatch::default()
        });
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["widgetSize"], 120);
        assert_eq!(json["shape"], "circle");
        assert_eq!(json["flashOnComplete"], true);
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn display_options_mirror_settings() {
        let settings = Settings {
            show_timer_display: false,
            flash_on_complete: true,
            ..Settings::default()
        };
        let options = settings.display_options();
        assert!(!options.show_timer_display);
        assert!(options.flash_on_complete);
    }
}
