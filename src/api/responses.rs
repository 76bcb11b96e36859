//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{DisplayFrame, Snapshot};

/// Optional body of `POST /start`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartRequest {
    pub duration: Option<u64>,
}

/// Body of `POST /add-time`
#[derive(Debug, Clone, Deserialize)]
pub struct AddTimeRequest {
    pub ms: i64,
}

/// Body of `POST /set-time`
#[derive(Debug, Clone, Deserialize)]
pub struct SetTimeRequest {
    pub ms: u64,
}

/// API response structure for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub state: Snapshot,
}

impl ApiResponse {
    /// Build a response whose status is the timer's resulting mode
    pub fn new(message: impl Into<String>, state: Snapshot) -> Self {
        Self {
            status: state.status().to_string().to_lowercase(),
            message: message.into(),
            timestamp: Utc::now(),
            state,
        }
    }
}

/// Full status: snapshot, rendered frame and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub state: Snapshot,
    pub display: DisplayFrame,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
