//! Test fixtures: PNG overlays, fake video bytes and multipart forms.

use axum_test::multipart::{MultipartForm, Part};
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::{json, Value};
use std::io::Cursor;

/// Solid semi-transparent PNG of the given size
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 180]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("Failed to encode test PNG");
    buffer
}

/// Bytes that pass upload validation; ffmpeg is not run in tests.
pub fn fake_video() -> Vec<u8> {
    b"\x00\x00\x00\x18ftypmp42 not a real video".to_vec()
}

pub fn png_part(filename: &str, data: Vec<u8>) -> Part {
    Part::bytes(data).file_name(filename).mime_type("image/png")
}

pub fn video_part(filename: &str) -> Part {
    Part::bytes(fake_video())
        .file_name(filename)
        .mime_type("video/mp4")
}

/// Local-source upload form for `campaign`
pub fn local_upload_form(campaign: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("campaign_name", campaign)
        .add_text("video_source", "local")
        .add_part("video_file", video_part("ad.mp4"))
}

/// YouTube credentials with a long-lived access token, so no refresh happens
pub fn authorized_youtube_credentials() -> Value {
    json!({
        "client_id": "client-id",
        "client_secret": "client-secret",
        "redirect_uri": "http://localhost:8000/integrations/youtube/callback",
        "scopes": ["https://www.googleapis.com/auth/youtube.upload"],
        "access_token": "access-token",
        "expiry": "2099-01-01T00:00:00Z"
    })
}

/// Drive credentials with a long-lived access token
pub fn authorized_drive_credentials() -> Value {
    json!({
        "client_id": "client-id",
        "client_secret": "client-secret",
        "redirect_uri": "http://localhost:8000/integrations/google_drive/callback",
        "scopes": ["https://www.googleapis.com/auth/drive.readonly"],
        "access_token": "access-token",
        "expiry": "2099-01-01T00:00:00Z"
    })
}

pub fn telegram_credentials() -> Value {
    json!({
        "bot_token": "123:abc",
        "chat_id": "42",
        "bot_username": "creative_bot",
        "bot_first_name": "Creative"
    })
}
