//! Persistence sink: stores every timer transition

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use super::TimerEvent;
use crate::services::StateStore;

/// Write a snapshot to `store` each time the timer changes mode.
/// Per-tick updates never reach this task.
pub async fn persistence_task(mut events: broadcast::Receiver<TimerEvent>, store: StateStore) {
    info!("Starting persistence task ({})", store.path().display());

    loop {
        match events.recv().await {
            Ok(TimerEvent::StateChanged(snapshot)) => {
                debug!("Persisting timer transition: {}", snapshot.status());
                store.save(&snapshot).await;
            }
            Ok(TimerEvent::Completed) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Persistence task lagged, skipped {} transitions", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Timer events closed, stopping persistence task");
                break;
            }
        }
    }
}
