use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, GenericImageView, ImageReader, RgbaImage};
use std::io::Cursor;

const JPEG_START_QUALITY: u8 = 90;
const JPEG_MIN_QUALITY: u8 = 50;
const JPEG_QUALITY_STEP: u8 = 10;

pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .context("Failed to detect image format")?;
    reader.decode().context("Failed to decode image")
}

/// Largest size with the aspect ratio of `(width, height)` that fits in `(max_w, max_h)`.
/// Never upscales.
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    let scale = (max_w as f64 / width as f64)
        .min(max_h as f64 / height as f64)
        .min(1.0);
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_w.max(1));
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_h.max(1));
    (w, h)
}

/// Alpha-composite the modal PNG centered on the frame, scaled down to fit when larger.
/// The result keeps the frame's dimensions.
pub fn composite_modal(frame: &DynamicImage, modal_png: &[u8]) -> Result<RgbaImage> {
    let mut modal = decode_image(modal_png)
        .context("Invalid modal image")?
        .to_rgba8();

    let (frame_w, frame_h) = frame.dimensions();
    let (modal_w, modal_h) = modal.dimensions();
    let (target_w, target_h) = fit_within(modal_w, modal_h, frame_w, frame_h);

    if (target_w, target_h) != (modal_w, modal_h) {
        modal = imageops::resize(&modal, target_w, target_h, imageops::FilterType::Lanczos3);
    }

    let x = (frame_w as i64 - target_w as i64) / 2;
    let y = (frame_h as i64 - target_h as i64) / 2;

    let mut canvas = frame.to_rgba8();
    imageops::overlay(&mut canvas, &modal, x.max(0), y.max(0));

    Ok(canvas)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .context("Failed to encode JPEG")?;
    Ok(buffer)
}

/// Encode as JPEG at quality 90, lowering it in steps of 10 (down to 50) while the
/// result exceeds `max_bytes`. The floor-quality encoding is returned even if still too big.
pub fn encode_jpeg_within_limit(img: &DynamicImage, max_bytes: usize) -> Result<Vec<u8>> {
    let mut quality = JPEG_START_QUALITY;
    loop {
        let encoded = encode_jpeg(img, quality)?;
        if encoded.len() <= max_bytes || quality <= JPEG_MIN_QUALITY {
            if encoded.len() > max_bytes {
                tracing::warn!(
                    size_bytes = encoded.len(),
                    max_bytes,
                    "Thumbnail exceeds size limit at minimum quality"
                );
            }
            return Ok(encoded);
        }
        quality -= JPEG_QUALITY_STEP;
    }
}
