//! Thumbnail generation: first frame, optionally with a modal overlay.

use crate::image::{composite_modal, decode_image, encode_jpeg_within_limit};
use crate::video::FFmpegService;
use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::Path;

/// YouTube rejects custom thumbnails above 2 MB
pub const MAX_THUMBNAIL_BYTES: usize = 2 * 1024 * 1024;

/// What to put on the thumbnail
#[derive(Debug, Clone)]
pub enum ThumbnailSource {
    None,
    FirstFrame,
    /// PNG bytes of the modal to composite over the first frame
    Modal(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct ThumbnailProcessor {
    ffmpeg: FFmpegService,
    max_bytes: usize,
}

impl ThumbnailProcessor {
    pub fn new(ffmpeg: FFmpegService) -> Self {
        Self {
            ffmpeg,
            max_bytes: MAX_THUMBNAIL_BYTES,
        }
    }

    /// JPEG bytes of the thumbnail, or `None` for [`ThumbnailSource::None`]
    #[tracing::instrument(skip(self, source, work_dir), fields(video = %video.display()))]
    pub async fn process_thumbnail(
        &self,
        source: &ThumbnailSource,
        video: &Path,
        work_dir: &Path,
    ) -> Result<Option<Vec<u8>>> {
        match source {
            ThumbnailSource::None => Ok(None),
            ThumbnailSource::FirstFrame => {
                let frame_path = work_dir.join("thumbnail.jpg");
                self.ffmpeg
                    .extract_frame(video, &frame_path)
                    .await
                    .context("Failed to extract first frame")?;
                let data = tokio::fs::read(&frame_path).await?;
                if data.len() <= self.max_bytes {
                    return Ok(Some(data));
                }
                let frame = decode_image(&data)?;
                self.encode(frame).await.map(Some)
            }
            ThumbnailSource::Modal(modal_png) => {
                let frame_path = work_dir.join("frame.png");
                self.ffmpeg
                    .extract_frame(video, &frame_path)
                    .await
                    .context("Failed to extract first frame")?;
                let frame_data = tokio::fs::read(&frame_path).await?;
                let modal_png = modal_png.clone();

                let composed = tokio::task::spawn_blocking(move || -> Result<DynamicImage> {
                    let frame = decode_image(&frame_data)?;
                    Ok(DynamicImage::ImageRgba8(composite_modal(&frame, &modal_png)?))
                })
                .await
                .context("Thumbnail compositing task panicked")??;

                self.encode(composed).await.map(Some)
            }
        }
    }

    async fn encode(&self, img: DynamicImage) -> Result<Vec<u8>> {
        let max_bytes = self.max_bytes;
        tokio::task::spawn_blocking(move || encode_jpeg_within_limit(&img, max_bytes))
            .await
            .context("Thumbnail encoding task panicked")?
    }
}
