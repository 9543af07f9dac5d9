//! ffprobe wrapper - dimensions, duration and rotation of the first video stream

use super::command::{path_arg, validate_executable};
use anyhow::{anyhow, Context, Result};
use creative_core::models::Orientation;
use serde::Serialize;
use std::path::Path;
use tokio::process::Command;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMetadata {
    /// Display width (after applying rotation)
    pub width: u32,
    /// Display height (after applying rotation)
    pub height: u32,
    pub duration: Option<f64>,
    pub codec: String,
    pub bitrate: Option<u64>,
    pub framerate: Option<f32>,
    pub rotation: i32,
}

impl VideoMetadata {
    pub fn orientation(&self) -> Orientation {
        Orientation::classify(self.width, self.height)
    }
}

#[derive(Debug, Clone)]
pub struct VideoProbe {
    ffprobe_path: String,
}

impl VideoProbe {
    pub fn new(ffprobe_path: String) -> Result<Self> {
        validate_executable(&ffprobe_path).context("Invalid ffprobe_path")?;
        Ok(Self { ffprobe_path })
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    pub async fn probe(&self, video_path: &Path) -> Result<VideoMetadata> {
        let start = std::time::Instant::now();
        let path = path_arg(video_path).context("Invalid video path")?;

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(&path)
            .output()
            .await
            .context("Failed to execute ffprobe")?;

        if !output.status.success() {
            return Err(anyhow!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        let metadata = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = metadata.width,
            height = metadata.height,
            rotation = metadata.rotation,
            codec = %metadata.codec,
            "Video probe completed"
        );

        Ok(metadata)
    }

    /// Check that the ffprobe binary can be executed
    pub async fn check_available(&self) -> Result<()> {
        let status = Command::new(&self.ffprobe_path)
            .arg("-version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .context("Failed to execute ffprobe")?;
        if !status.success() {
            return Err(anyhow!("ffprobe -version exited with {}", status));
        }
        Ok(())
    }
}

/// Parse `ffprobe -print_format json` output for the first video stream
pub fn parse_probe_output(stdout: &[u8]) -> Result<VideoMetadata> {
    let probe_data: serde_json::Value =
        serde_json::from_slice(stdout).context("Failed to parse ffprobe output")?;

    let stream = probe_data["streams"]
        .get(0)
        .ok_or_else(|| anyhow!("No video stream found"))?;
    let format = &probe_data["format"];

    let raw_width = stream["width"]
        .as_u64()
        .ok_or_else(|| anyhow!("Could not parse width"))? as u32;
    let raw_height = stream["height"]
        .as_u64()
        .ok_or_else(|| anyhow!("Could not parse height"))? as u32;

    let rotation = stream_rotation(stream);
    let (width, height) = if rotation.rem_euclid(180) == 90 {
        (raw_height, raw_width)
    } else {
        (raw_width, raw_height)
    };

    let duration = format["duration"]
        .as_str()
        .or_else(|| stream["duration"].as_str())
        .and_then(|d| d.parse::<f64>().ok());

    let codec = stream["codec_name"]
        .as_str()
        .unwrap_or("unknown")
        .to_string();

    let bitrate = format["bit_rate"]
        .as_str()
        .and_then(|b| b.parse::<u64>().ok());

    let framerate = stream["r_frame_rate"].as_str().and_then(|r| {
        let (num, den) = r.split_once('/')?;
        let num: f32 = num.parse().ok()?;
        let den: f32 = den.parse().ok()?;
        (den != 0.0).then(|| num / den)
    });

    Ok(VideoMetadata {
        width,
        height,
        duration,
        codec,
        bitrate,
        framerate,
        rotation,
    })
}

/// Rotation in degrees from `tags.rotate` or display-matrix side data
fn stream_rotation(stream: &serde_json::Value) -> i32 {
    if let Some(rotate) = stream["tags"]["rotate"]
        .as_str()
        .and_then(|r| r.trim().parse::<i32>().ok())
    {
        return rotate;
    }

    stream["side_data_list"]
        .as_array()
        .and_then(|list| {
            list.iter()
                .find_map(|side| side["rotation"].as_f64().map(|r| r.round() as i32))
        })
        .unwrap_or(0)
}
