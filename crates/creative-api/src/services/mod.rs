pub mod upload_pipeline;

pub use upload_pipeline::{BatchUploadRequest, UploadPipeline, UploadRequest, VideoInput};
