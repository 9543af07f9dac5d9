//! Creative Processing Library
//!
//! Upload validation, ffprobe/ffmpeg wrappers, letterboxed format derivation and
//! thumbnail compositing.

pub mod image;
pub mod thumbnail;
pub mod validator;
pub mod video;

pub use crate::image::{composite_modal, encode_jpeg_within_limit, render_preview, PreviewSize};
pub use thumbnail::{ThumbnailProcessor, ThumbnailSource};
pub use validator::{MediaValidator, ValidationError};
pub use crate::video::{
    create_other_formats, DerivedFormat, FFmpegService, VideoMetadata, VideoProbe,
};
