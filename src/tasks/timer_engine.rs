//! Timer engine: owns the timer and serializes commands and ticks

use std::time::Duration;
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::timer::{SavedState, Snapshot, Timer, TimerObserver};

/// Commands accepted by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum TimerCommand {
    Start(Option<u64>),
    Stop,
    Pause,
    Resume,
    Restart,
    AddTime(i64),
    SetTime(u64),
    Restore(SavedState),
    /// Replace the running countdown with a fresh one of the given length
    Reset(u64),
}

/// Events published when the timer changes mode
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    StateChanged(Snapshot),
    Completed,
}

struct Request {
    command: TimerCommand,
    reply: oneshot::Sender<Snapshot>,
}

/// Observer that fans timer notifications out over channels
#[derive(Debug)]
pub struct ChannelObserver {
    update_tx: watch::Sender<Snapshot>,
    event_tx: broadcast::Sender<TimerEvent>,
}

impl TimerObserver for ChannelObserver {
    fn on_update(&mut self, snapshot: &Snapshot) {
        self.update_tx.send_replace(*snapshot);
    }

    fn on_state_change(&mut self, snapshot: &Snapshot) {
        self.update_tx.send_replace(*snapshot);
        if let Err(e) = self.event_tx.send(TimerEvent::StateChanged(*snapshot)) {
            debug!("No listeners for state change: {}", e);
        }
    }

    fn on_complete(&mut self) {
        if let Err(e) = self.event_tx.send(TimerEvent::Completed) {
            debug!("No listeners for completion: {}", e);
        }
    }
}

/// Cloneable handle used to drive the engine and observe the timer
#[derive(Debug, Clone)]
pub struct TimerHandle {
    command_tx: mpsc::Sender<Request>,
    update_rx: watch::Receiver<Snapshot>,
    event_tx: broadcast::Sender<TimerEvent>,
}

impl TimerHandle {
    /// Send a command and wait for the resulting snapshot
    pub async fn send(&self, command: TimerCommand) -> Result<Snapshot, String> {
        let (reply, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Request { command, reply })
            .await
            .map_err(|_| "Timer engine is not running".to_string())?;

        reply_rx
            .await
            .map_err(|_| "Timer engine dropped the command".to_string())
    }

    pub async fn start(&self, duration: Option<u64>) -> Result<Snapshot, String> {
        self.send(TimerCommand::Start(duration)).await
    }

    pub async fn stop(&self) -> Result<Snapshot, String> {
        self.send(TimerCommand::Stop).await
    }

    pub async fn pause(&self) -> Result<Snapshot, String> {
        self.send(TimerCommand::Pause).await
    }

    pub async fn resume(&self) -> Result<Snapshot, String> {
        self.send(TimerCommand::Resume).await
    }

    pub async fn restart(&self) -> Result<Snapshot, String> {
        self.send(TimerCommand::Restart).await
    }

    pub async fn add_time(&self, delta_ms: i64) -> Result<Snapshot, String> {
        self.send(TimerCommand::AddTime(delta_ms)).await
    }

    pub async fn set_time(&self, ms: u64) -> Result<Snapshot, String> {
        self.send(TimerCommand::SetTime(ms)).await
    }

    pub async fn restore(&self, saved: SavedState) -> Result<Snapshot, String> {
        self.send(TimerCommand::Restore(saved)).await
    }

    /// Latest snapshot, refreshed on every tick
    pub fn snapshot(&self) -> Snapshot {
        *self.update_rx.borrow()
    }

    /// Per-tick snapshots for display sinks
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.update_rx.clone()
    }

    /// Transition and completion events for persistence and completion sinks
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }
}

/// Spawn the engine task with a stopped timer of the given duration
pub fn spawn_timer_engine(duration: u64, tick: Duration) -> TimerHandle {
    let (command_tx, command_rx) = mpsc::channel(32);
    let (event_tx, _) = broadcast::channel(64);

    let (update_tx, update_rx) = watch::channel(Timer::with_duration(duration, ()).snapshot());

    let timer = Timer::with_duration(
        duration,
        ChannelObserver {
            update_tx,
            event_tx: event_tx.clone(),
        },
    );

    tokio::spawn(run_engine(timer, command_rx, tick));

    TimerHandle {
        command_tx,
        update_rx,
        event_tx,
    }
}

async fn run_engine(
    mut timer: Timer<ChannelObserver>,
    mut command_rx: mpsc::Receiver<Request>,
    tick: Duration,
) {
    info!("Starting timer engine (tick every {}ms)", tick.as_millis());

    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            request = command_rx.recv() => {
                let Some(Request { command, reply }) = request else {
                    info!("All timer handles dropped, stopping engine");
                    break;
                };

                let was_ticking = timer.is_ticking();
                apply(&mut timer, command);
                if timer.is_ticking() && !was_ticking {
                    ticker.reset();
                }

                if reply.send(timer.snapshot()).is_err() {
                    warn!("Command sender went away before the reply");
                }
            }

            _ = ticker.tick(), if timer.is_ticking() => {
                timer.tick();
            }
        }
    }
}

fn apply(timer: &mut Timer<ChannelObserver>, command: TimerCommand) {
    debug!("Applying timer command: {:?}", command);

    match command {
        TimerCommand::Start(duration) => timer.start(duration),
        TimerCommand::Stop => timer.stop(),
        TimerCommand::Pause => timer.pause(),
        TimerCommand::Resume => timer.resume(),
        TimerCommand::Restart => timer.restart(),
        TimerCommand::AddTime(delta) => timer.add_time(delta),
        TimerCommand::SetTime(ms) => timer.set_time(ms),
        TimerCommand::Restore(saved) => timer.restore(&saved),
        TimerCommand::Reset(duration) => {
            timer.stop();
            timer.start(Some(duration));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerStatus;
    use tokio::time::{sleep, timeout};

    const TICK: Duration = Duration::from_millis(16);

    async fn next_completion(events: &mut broadcast::Receiver<TimerEvent>) -> usize {
        let mut state_changes = 0;
        loop {
            match events.recv().await {
                Ok(TimerEvent::Completed) => return state_changes,
                Ok(TimerEvent::StateChanged(_)) => state_changes += 1,
                Err(e) => panic!("event channel failed: {}", e),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn commands_reply_with_resulting_snapshot() {
        let handle = spawn_timer_engine(60_000, TICK);

        let started = handle.start(Some(30_000)).await.unwrap();
        assert_eq!(started.status(), TimerStatus::Running);
        assert_eq!(started.time_remaining, 30_000);

        let paused = handle.pause().await.unwrap();
        assert_eq!(paused.status(), TimerStatus::Paused);

        let stopped = handle.stop().await.unwrap();
        assert_eq!(stopped.status(), TimerStatus::Stopped);
        assert_eq!(stopped.time_remaining, 30_000);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_update_the_watch_channel() {
        let handle = spawn_timer_engine(10_000, TICK);
        handle.start(None).await.unwrap();

        sleep(Duration::from_millis(1_000)).await;
        let snapshot = handle.snapshot();
        assert!(snapshot.is_running);
        assert!((9_000..=9_016).contains(&snapshot.time_remaining));
    }

    #[tokio::test(start_paused = true)]
    async fn completion_event_fires_once() {
        let handle = spawn_timer_engine(60_000, TICK);
        let mut events = handle.subscribe();

        handle.start(Some(100)).await.unwrap();
        let state_changes = timeout(Duration::from_secs(1), next_completion(&mut events))
            .await
            .expect("timer never completed");
        assert_eq!(state_changes, 2);

        let snapshot = handle.snapshot();
        assert!(snapshot.is_completed);
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.time_remaining, 0);

        let again = timeout(Duration::from_millis(500), events.recv()).await;
        assert!(again.is_err(), "unexpected event after completion: {:?}", again);
    }

    #[tokio::test(start_paused = true)]
    async fn paused_engine_stops_ticking() {
        let handle = spawn_timer_engine(10_000, TICK);
        handle.start(None).await.unwrap();
        sleep(Duration::from_millis(500)).await;

        let paused = handle.pause().await.unwrap();
        sleep(Duration::from_millis(2_000)).await;
        assert_eq!(handle.snapshot(), paused);

        handle.resume().await.unwrap();
        sleep(Duration::from_millis(500)).await;
        assert!(handle.snapshot().time_remaining < paused.time_remaining);
    }

    #[tokio::test(start_paused = true)]
    async fn restore_resumes_ticking() {
        let handle = spawn_timer_engine(60_000, TICK);
        let restored = handle
            .restore(SavedState {
                duration: Some(10_000),
                time_remaining: Some(4_000),
                is_running: Some(true),
                is_paused: Some(false),
                is_completed: Some(false),
            })
            .await
            .unwrap();
        assert_eq!(restored.status(), TimerStatus::Running);
        assert_eq!(restored.time_remaining, 4_000);

        sleep(Duration::from_millis(1_000)).await;
        assert!((3_000..=3_016).contains(&handle.snapshot().time_remaining));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_starts_fresh_countdown() {
        let handle = spawn_timer_engine(60_000, TICK);
        handle.start(Some(5_000)).await.unwrap();
        sleep(Duration::from_millis(1_000)).await;

        let reset = handle.send(TimerCommand::Reset(120_000)).await.unwrap();
        assert_eq!(reset.duration, 120_000);
        assert_eq!(reset.time_remaining, 120_000);
        assert_eq!(reset.status(), TimerStatus::Running);
    }
}
