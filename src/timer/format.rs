//! Rendering helpers: remaining-time text, progress color and display frames

use std::fmt;

use serde::{Deserialize, Serialize};

use super::snapshot::Snapshot;

/// Format remaining milliseconds as `m:ss`, rounding up to the next whole
/// second so "0:00" only shows once the countdown is actually over.
pub fn format_time(remaining_ms: u64) -> String {
    let total_seconds = remaining_ms.div_ceil(1000);
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// HSL color with hue in degrees and saturation/lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    const GREEN: Hsl = Hsl { h: 120.0, s: 100.0, l: 50.0 };
    const YELLOW: Hsl = Hsl { h: 60.0, s: 100.0, l: 50.0 };
    const RED: Hsl = Hsl { h: 0.0, s: 100.0, l: 50.0 };

    fn lerp(from: Hsl, to: Hsl, t: f64) -> Hsl {
        Hsl {
            h: from.h + (to.h - from.h) * t,
            s: from.s + (to.s - from.s) * t,
            l: from.l + (to.l - from.l) * t,
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

/// Map progress in `[0, 1]` to green → yellow → red, switching segments at 0.5
pub fn progress_color(progress: f64) -> Hsl {
    let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };

    if progress < 0.5 {
        Hsl::lerp(Hsl::GREEN, Hsl::YELLOW, progress * 2.0)
    } else {
        Hsl::lerp(Hsl::YELLOW, Hsl::RED, (progress - 0.5) * 2.0)
    }
}

/// The four modes a timer can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Stopped,
    Running,
    Paused,
    Completed,
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimerStatus::Stopped => "Stopped",
            TimerStatus::Running => "Running",
            TimerStatus::Paused => "Paused",
            TimerStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

/// User preferences that affect how a snapshot is rendered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayOptions {
    pub show_timer_display: bool,
    pub flash_on_complete: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_timer_display: true,
            flash_on_complete: false,
        }
    }
}

/// Everything a widget needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFrame {
    pub color: String,
    pub hue: f64,
    pub text: String,
    /// Whether the digits are drawn on top of the colored shape
    pub visible: bool,
    pub flash: bool,
    pub status: TimerStatus,
    pub progress: f64,
}

impl DisplayFrame {
    pub fn render(snapshot: &Snapshot, options: DisplayOptions) -> Self {
        let color = progress_color(snapshot.progress);
        let touched = snapshot.is_running || snapshot.time_remaining < snapshot.duration;

        Self {
            color: color.to_string(),
            hue: color.h,
            text: format_time(snapshot.time_remaining),
            visible: options.show_timer_display && touched,
            flash: options.flash_on_complete && snapshot.is_completed,
            status: snapshot.status(),
            progress: snapshot.progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_rounds_up_to_whole_seconds() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(1), "0:01");
        assert_eq!(format_time(1000), "0:01");
        assert_eq!(format_time(1001), "0:02");
        assert_eq!(format_time(59_001), "1:00");
        assert_eq!(format_time(300_000), "5:00");
        assert_eq!(format_time(3_723_000), "62:03");
    }

    #[test]
    fn color_breakpoints() {
        assert_eq!(progress_color(0.0), Hsl { h: 120.0, s: 100.0, l: 50.0 });
        assert_eq!(progress_color(0.5), Hsl { h: 60.0, s: 100.0, l: 50.0 });
        assert_eq!(progress_color(1.0), Hsl { h: 0.0, s: 100.0, l: 50.0 });
        assert_eq!(progress_color(0.25).h, 90.0);
        assert_eq!(progress_color(0.75).h, 30.0);
    }

    #[test]
    fn color_clamps_out_of_range_progress() {
        assert_eq!(progress_color(-0.3).h, 120.0);
        assert_eq!(progress_color(1.7).h, 0.0);
        assert_eq!(progress_color(f64::NAN).h, 120.0);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(TimerStatus::Paused).unwrap(), "paused");
        assert_eq!(TimerStatus::Paused.to_string(), "Paused");
    }

    #[test]
    fn hsl_renders_as_css() {
        assert_eq!(progress_color(0.5).to_string(), "hsl(60, 100%, 50%)");
    }

    fn snapshot(time_remaining: u64, is_running: bool, is_completed: bool) -> Snapshot {
        Snapshot {
            duration: 60_000,
            time_remaining,
            is_running,
            is_paused: false,
            is_completed,
            progress: 1.0 - time_remaining as f64 / 60_000.0,
        }
    }

    #[test]
    fn digits_hidden_for_untouched_stopped_timer() {
        let frame = DisplayFrame::render(&snapshot(60_000, false, false), DisplayOptions::default());
        assert!(!frame.visible);
        assert_eq!(frame.text, "1:00");
        assert_eq!(frame.status, TimerStatus::Stopped);
        assert_eq!(frame.color, "hsl(120, 100%, 50%)");
    }

    #[test]
    fn digits_visible_while_running_or_partially_elapsed() {
        let running = DisplayFrame::render(&snapshot(60_000, true, false), DisplayOptions::default());
        assert!(running.visible);

        let partial = DisplayFrame::render(&snapshot(30_000, false, false), DisplayOptions::default());
        assert!(partial.visible);

        let hidden = DisplayOptions {
            show_timer_display: false,
            ..DisplayOptions::default()
        };
        assert!(!DisplayFrame::render(&snapshot(30_000, true, false), hidden).visible);
    }

    #[test]
    fn flash_only_when_completed_and_enabled() {
        let options = DisplayOptions {
            flash_on_complete: true,
            ..DisplayOptions::default()
        };
        assert!(DisplayFrame::render(&snapshot(0, false, true), options).flash);
        assert!(!DisplayFrame::render(&snapshot(10, true, false), options).flash);
        assert!(!DisplayFrame::render(&snapshot(0, false, true), DisplayOptions::default()).flash);
    }
}
