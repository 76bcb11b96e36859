//! Side-effecting collaborators of the timer
//! 
//! This module contains JSON file storage for timer state and settings, and
//! the shell hook run when a countdown completes.

pub mod hooks;
pub mod storage;

// Re-export main types
pub use hooks::run_completion_hook;
pub use storage::{SettingsStore, StateStore};
