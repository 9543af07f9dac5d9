//! Image compositing for thumbnails and modal previews

pub mod overlay;
pub mod preview;

pub use overlay::{composite_modal, decode_image, encode_jpeg_within_limit, fit_within};
pub use preview::{render_preview, PreviewSize};
