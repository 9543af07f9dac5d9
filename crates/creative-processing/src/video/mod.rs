//! Video processing module

pub mod command;
pub mod ffmpeg;
pub mod formats;
pub mod probe;

pub use ffmpeg::FFmpegService;
pub use formats::{create_other_formats, resolve_orientation, DerivedFormat};
pub use probe::{VideoMetadata, VideoProbe};
