//! FFmpegService - metadata stripping, letterboxing and frame extraction.

use super::command::{path_arg, run_ffmpeg, validate_executable};
use anyhow::{anyhow, Context, Result};
use creative_core::models::Orientation;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct FFmpegService {
    ffmpeg_path: String,
}

/// `-map_metadata -1 -map_chapters -1 -c copy`
pub fn metadata_strip_args(input: &str, output: &str) -> Vec<String> {
    [
        "-y",
        "-i",
        input,
        "-map_metadata",
        "-1",
        "-map_chapters",
        "-1",
        "-c",
        "copy",
        output,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Scale into the target canvas keeping aspect ratio, then pad with black bars
pub fn letterbox_filter(width: u32, height: u32) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1",
        w = width,
        h = height
    )
}

pub fn letterbox_args(input: &str, output: &str, orientation: Orientation) -> Vec<String> {
    let (width, height) = orientation.target_dimensions();
    vec![
        "-y".to_string(),
        "-i".to_string(),
        input.to_string(),
        "-vf".to_string(),
        letterbox_filter(width, height),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "veryfast".to_string(),
        "-crf".to_string(),
        "23".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        output.to_string(),
    ]
}

/// First frame at t=0. JPEG output gets `-q:v 2`.
pub fn extract_frame_args(input: &str, output: &str) -> Vec<String> {
    let mut args: Vec<String> = ["-y", "-ss", "0", "-i", input, "-frames:v", "1"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let lower = output.to_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        args.push("-q:v".to_string());
        args.push("2".to_string());
    }
    args.push(output.to_string());
    args
}

impl FFmpegService {
    pub fn new(ffmpeg_path: String) -> Result<Self> {
        validate_executable(&ffmpeg_path).context("Invalid ffmpeg_path")?;
        Ok(Self { ffmpeg_path })
    }

    /// Strip container metadata and chapters. Falls back to a byte copy when ffmpeg fails
    /// or a path cannot be handed to it. Returns whether the metadata was actually stripped.
    #[tracing::instrument(skip(self), fields(ffmpeg.operation = "strip_metadata"))]
    pub async fn process_video(&self, input: &Path, output: &Path) -> Result<bool> {
        let stripped = match (path_arg(input), path_arg(output)) {
            (Ok(input), Ok(output)) => {
                run_ffmpeg(&self.ffmpeg_path, &metadata_strip_args(&input, &output)).await
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        };

        match stripped {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!(error = %e, "Metadata strip failed, copying source unchanged");
                tokio::fs::copy(input, output)
                    .await
                    .context("Failed to copy source video")?;
                Ok(false)
            }
        }
    }

    /// Letterbox `input` into the canvas of `orientation`
    #[tracing::instrument(skip(self), fields(ffmpeg.operation = "letterbox", orientation = %orientation))]
    pub async fn letterbox(
        &self,
        input: &Path,
        output: &Path,
        orientation: Orientation,
    ) -> Result<()> {
        let start = std::time::Instant::now();
        let args = letterbox_args(&path_arg(input)?, &path_arg(output)?, orientation);
        run_ffmpeg(&self.ffmpeg_path, &args).await?;
        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            "Letterboxed variant created"
        );
        Ok(())
    }

    /// Extract the first frame. The output format follows the extension of `output`.
    #[tracing::instrument(skip(self), fields(ffmpeg.operation = "extract_frame"))]
    pub async fn extract_frame(&self, input: &Path, output: &Path) -> Result<()> {
        let args = extract_frame_args(&path_arg(input)?, &path_arg(output)?);
        run_ffmpeg(&self.ffmpeg_path, &args).await?;

        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(anyhow!("FFmpeg produced no frame for {}", input.display()));
        }
        Ok(())
    }

    /// Check that the ffmpeg binary can be executed
    pub async fn check_available(&self) -> Result<()> {
        let status = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .context("Failed to execute ffmpeg")?;
        if !status.success() {
            return Err(anyhow!("ffmpeg -version exited with {}", status));
        }
        Ok(())
    }
}
