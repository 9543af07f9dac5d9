//! Subprocess helpers shared by the ffmpeg and ffprobe wrappers.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

const DANGEROUS_CHARS: [char; 11] = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];

/// Reject paths with shell metacharacters or directory traversal
pub fn validate_path(path: &str) -> Result<()> {
    if path.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }

    if path.contains("..") {
        return Err(anyhow!("Path contains directory traversal: {}", path));
    }

    Ok(())
}

/// Validate a configured executable path (`ffmpeg`, `/usr/bin/ffprobe`, ...)
pub fn validate_executable(path: &str) -> Result<()> {
    validate_path(path)?;

    if path.is_empty()
        || !path.chars().all(|c| {
            c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
        })
    {
        return Err(anyhow!("Invalid executable path: {}", path));
    }

    Ok(())
}

pub fn path_arg(path: &Path) -> Result<String> {
    let s = path.to_string_lossy().to_string();
    validate_path(&s)?;
    Ok(s)
}

/// Run ffmpeg with `args`, failing with its stderr when it exits non-zero
pub async fn run_ffmpeg(ffmpeg_path: &str, args: &[String]) -> Result<()> {
    let output = Command::new(ffmpeg_path)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .context("Failed to execute ffmpeg")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("FFmpeg failed: {}", stderr.trim()));
    }

    Ok(())
}
