//! Shrink Timer - a countdown timer that shifts from green to red as it runs
//! 
//! This library provides the countdown state machine, the engine task that
//! ticks it, JSON persistence of its state, and an HTTP control surface.

pub mod config;
pub mod timer;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use timer::{Snapshot, Timer, TimerObserver};
pub use utils::signals::shutdown_signal;
