//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    state::{AppState, Settings, SettingsPatch},
    tasks::TimerCommand,
    timer::{DisplayFrame, Snapshot},
};
use super::responses::{
    AddTimeRequest, ApiResponse, HealthResponse, SetTimeRequest, StartRequest, StatusResponse,
};

type CommandResult = Result<Json<ApiResponse>, StatusCode>;

/// Send a command to the timer and wrap the resulting snapshot
async fn run_command(
    state: &AppState,
    action: &str,
    command: TimerCommand,
    message: &str,
) -> CommandResult {
    match state.command(action, command).await {
        Ok(snapshot) => {
            info!("{} endpoint called - timer is {}", action, snapshot.status());
            Ok(Json(ApiResponse::new(message, snapshot)))
        }
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start the countdown, optionally with a new duration
pub async fn start_handler(State(state): State<Arc<AppState>>, body: Bytes) -> CommandResult {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        StartRequest::default()
    } else {
        serde_json::from_slice::<StartRequest>(&body).map_err(|e| {
            warn!("Rejecting malformed start request: {}", e);
            StatusCode::BAD_REQUEST
        })?
    };

    run_command(&state, "start", TimerCommand::Start(request.duration), "Timer started").await
}

/// Handle POST /stop - Stop and rewind the countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    run_command(&state, "stop", TimerCommand::Stop, "Timer stopped").await
}

/// Handle POST /pause - Pause a running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    run_command(&state, "pause", TimerCommand::Pause, "Pause requested").await
}

/// Handle POST /resume - Resume a paused countdown
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    run_command(&state, "resume", TimerCommand::Resume, "Resume requested").await
}

/// Handle POST /restart - Restart with the current duration
pub async fn restart_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    run_command(&state, "restart", TimerCommand::Restart, "Timer restarted").await
}

/// Handle POST /add-time - Extend or shorten the countdown
pub async fn add_time_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddTimeRequest>,
) -> CommandResult {
    let message = format!("Added {}ms", request.ms);
    run_command(&state, "add-time", TimerCommand::AddTime(request.ms), &message).await
}

/// Handle POST /set-time - Replace duration and remaining time
pub async fn set_time_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetTimeRequest>,
) -> CommandResult {
    let message = format!("Time set to {}ms", request.ms);
    run_command(&state, "set-time", TimerCommand::SetTime(request.ms), &message).await
}

/// Handle POST /reset - Fresh countdown of the default duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    match state.reset().await {
        Ok(snapshot) => Ok(Json(ApiResponse::new("Timer reset to default duration", snapshot))),
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /state - Latest timer snapshot
pub async fn state_handler(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.timer.snapshot())
}

/// Handle GET /display - Latest snapshot rendered for a widget
pub async fn display_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DisplayFrame>, StatusCode> {
    state.display_frame().map(Json).map_err(|e| {
        error!("Failed to render display frame: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /status - Timer state plus server metadata
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let display = match state.display_frame() {
        Ok(frame) => frame,
        Err(e) => {
            error!("Failed to render display frame: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        state: state.timer.snapshot(),
        display,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /settings - Current settings
pub async fn get_settings_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Settings>, StatusCode> {
    state.get_settings().map(Json).map_err(|e| {
        error!("Failed to read settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle PUT /settings - Merge and persist a partial settings update
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<Settings>, StatusCode> {
    match state.update_settings(patch).await {
        Ok(settings) => Ok(Json(settings)),
        Err(e) => {
            error!("Failed to update settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
