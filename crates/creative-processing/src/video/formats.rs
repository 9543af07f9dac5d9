//! Letterboxed variants of a source video in the orientations it is not already in.

use super::{FFmpegService, VideoProbe};
use creative_core::models::{Orientation, SourceOrientation};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedFormat {
    pub orientation: Orientation,
    pub path: PathBuf,
    /// `false` when ffmpeg failed and `path` holds an unmodified copy of the source
    pub letterboxed: bool,
}

/// Declared orientation, or ffprobe classification for `Auto`. A failed probe counts as
/// horizontal.
pub async fn resolve_orientation(
    declared: SourceOrientation,
    probe: &VideoProbe,
    source: &Path,
) -> Orientation {
    match declared {
        SourceOrientation::Declared(orientation) => orientation,
        SourceOrientation::Auto => match probe.probe(source).await {
            Ok(metadata) => metadata.orientation(),
            Err(e) => {
                tracing::warn!(error = %e, "Probe failed, assuming horizontal source");
                Orientation::Horizontal
            }
        },
    }
}

/// Derive the two other orientations, in vertical, square, horizontal order.
///
/// A failed conversion falls back to a copy of the source; a failed copy skips the format.
#[tracing::instrument(skip(ffmpeg, source, output_dir), fields(source_orientation = %source_orientation))]
pub async fn create_other_formats(
    ffmpeg: &FFmpegService,
    source: &Path,
    source_orientation: Orientation,
    output_dir: &Path,
) -> Vec<DerivedFormat> {
    let mut formats = Vec::new();

    for orientation in source_orientation.others() {
        let output = output_dir.join(format!("{}.mp4", orientation));

        match ffmpeg.letterbox(source, &output, orientation).await {
            Ok(()) => formats.push(DerivedFormat {
                orientation,
                path: output,
                letterboxed: true,
            }),
            Err(e) => {
                tracing::warn!(
                    orientation = %orientation,
                    error = %e,
                    "Letterbox failed, falling back to source copy"
                );
                match tokio::fs::copy(source, &output).await {
                    Ok(_) => formats.push(DerivedFormat {
                        orientation,
                        path: output,
                        letterboxed: false,
                    }),
                    Err(copy_err) => {
                        tracing::error!(
                            orientation = %orientation,
                            error = %copy_err,
                            "Source copy failed, skipping format"
                        );
                    }
                }
            }
        }
    }

    formats
}
