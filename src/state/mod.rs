//! State management module
//! 
//! This module contains the shared application state and the user settings.

pub mod app_state;
pub mod settings;

// Re-export main types
pub use app_state::AppState;
pub use settings::{Settings, SettingsPatch};
