//! Completion hook: runs a user-supplied shell command

use tokio::process::Command;
use tracing::{debug, info};

/// Run `command` through `sh -c` and wait for it to finish
pub async fn run_completion_hook(command: &str) -> Result<(), String> {
    debug!("Running completion hook: {}", command);

    let output = Command::new("sh")
        .args(["-c", command])
        .output()
        .await
        .map_err(|e| format!("Failed to execute completion hook: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "Completion hook exited with {}: {}",
            output.status.code().unwrap_or(-1),
            stderr.trim()
        ));
    }

    info!("Completion hook finished");
    Ok(())
}
