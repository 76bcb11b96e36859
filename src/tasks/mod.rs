//! Background tasks module
//! 
//! This module contains the timer engine and the sinks that react to its
//! transitions alongside the HTTP server.

pub mod completion;
pub mod persistence;
pub mod timer_engine;

// Re-export main functions
pub use completion::completion_task;
pub use persistence::persistence_task;
pub use timer_engine::{spawn_timer_engine, TimerCommand, TimerEvent, TimerHandle};
