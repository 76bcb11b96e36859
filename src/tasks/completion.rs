//! Completion sink: reacts once to each finished countdown

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};

use super::TimerEvent;
use crate::services::run_completion_hook;

/// Log each completion and run the optional shell hook
pub async fn completion_task(mut events: broadcast::Receiver<TimerEvent>, hook: Option<String>) {
    info!("Starting completion task");

    loop {
        match events.recv().await {
            Ok(TimerEvent::Completed) => {
                info!("Countdown finished");

                if let Some(command) = &hook {
                    if let Err(e) = run_completion_hook(command).await {
                        error!("{}", e);
                    }
                }
            }
            Ok(TimerEvent::StateChanged(_)) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Completion task lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Timer events closed, stopping completion task");
                break;
            }
        }
    }
}
