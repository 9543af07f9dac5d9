use super::overlay::composite_modal;
use anyhow::{Context, Result};
use image::{DynamicImage, Rgba, RgbaImage};
use std::io::Cursor;

const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 720;
const MAX_SIDE: u32 = 3840;
const CANVAS_COLOR: Rgba<u8> = Rgba([48, 48, 48, 255]);

/// Canvas size of a modal preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSize {
    pub width: u32,
    pub height: u32,
}

impl Default for PreviewSize {
    fn default() -> Self {
        PreviewSize {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl PreviewSize {
    /// Missing or zero sides take the default; each side is capped at 3840
    pub fn from_query(width: Option<u32>, height: Option<u32>) -> Self {
        let pick = |value: Option<u32>, default: u32| match value {
            Some(v) if v > 0 => v.min(MAX_SIDE),
            _ => default,
        };
        PreviewSize {
            width: pick(width, DEFAULT_WIDTH),
            height: pick(height, DEFAULT_HEIGHT),
        }
    }
}

/// Composite the modal over a dark-grey canvas and return PNG bytes
pub fn render_preview(modal_png: &[u8], size: PreviewSize) -> Result<Vec<u8>> {
    let canvas = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        size.width,
        size.height,
        CANVAS_COLOR,
    ));
    let composed = composite_modal(&canvas, modal_png)?;

    let mut buffer = Vec::new();
    composed
        .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .context("Failed to encode preview PNG")?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn test_preview_size_defaults_and_cap() {
        assert_eq!(PreviewSize::from_query(None, None), PreviewSize::default());
        assert_eq!(
            PreviewSize::from_query(Some(10_000), Some(0)),
            PreviewSize {
                width: 3840,
                height: 720
            }
        );
    }

    #[test]
    fn test_render_preview() {
        let modal = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let mut png = Vec::new();
        modal
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let bytes = render_preview(
            &png,
            PreviewSize {
                width: 40,
                height: 20,
            },
        )
        .unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.dimensions(), (40, 20));
        assert_eq!(img.get_pixel(0, 0), CANVAS_COLOR);
        assert_eq!(img.get_pixel(20, 10), Rgba([255, 0, 0, 255]));
    }
}
