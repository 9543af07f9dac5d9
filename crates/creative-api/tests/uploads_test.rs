//! Video upload and upload record integration tests.
//!
//! Run with: `cargo test -p creative-api --test uploads_test`
//! Requires Docker for testcontainers (Postgres). The Google APIs and Telegram are mocked; ffmpeg is
//! absent, so processing copies the source unchanged.

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::fixtures::{
    authorized_drive_credentials, authorized_youtube_credentials, create_test_png, fake_video,
    local_upload_form, png_part, telegram_credentials, video_part,
};
use helpers::{setup_test_app, setup_test_app_with, TestApp};
use mockito::{Matcher, Mock};
use serde_json::{json, Value};

/// Mock the resumable YouTube upload. Each session PUT answers `video_id`.
async fn mock_youtube_upload(app: &mut TestApp, video_id: &str, hits: usize) -> (Mock, Mock) {
    let session_url = format!("{}/upload-session/{}", app.upstream.url(), video_id);
    let init = app
        .upstream
        .mock("POST", "/upload/youtube/v3/videos")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer access-token")
        .with_status(200)
        .with_header("location", &session_url)
        .expect(hits)
        .create_async()
        .await;
    let put = app
        .upstream
        .mock("PUT", format!("/upload-session/{}", video_id).as_str())
        .with_status(200)
        .with_body(json!({ "id": video_id }).to_string())
        .expect(hits)
        .create_async()
        .await;
    (init, put)
}

/// Mock one resumable YouTube upload whose metadata body matches `title_pattern`.
/// A non-200 `status` fails the session request.
async fn mock_youtube_title(
    app: &mut TestApp,
    title_pattern: &str,
    video_id: &str,
    status: usize,
) -> Mock {
    let session_url = format!("{}/upload-session/{}", app.upstream.url(), video_id);
    let init = app
        .upstream
        .mock("POST", "/upload/youtube/v3/videos")
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex(title_pattern.to_string()))
        .with_status(status)
        .with_header("location", &session_url)
        .expect(1)
        .create_async()
        .await;
    app.upstream
        .mock("PUT", format!("/upload-session/{}", video_id).as_str())
        .with_status(200)
        .with_body(json!({ "id": video_id }).to_string())
        .create_async()
        .await;
    init
}

#[tokio::test]
async fn test_local_upload_publishes_and_records() {
    let mut app = setup_test_app().await;
    app.store_credentials("youtube", authorized_youtube_credentials())
        .await;
    let (init, put) = mock_youtube_upload(&mut app, "vid123", 1).await;

    let response = app
        .client()
        .post("/upload/video")
        .multipart(local_upload_form("Spring Sale").add_text("ad_group", "ag-1"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["youtube_url"], "https://www.youtube.com/watch?v=vid123");
    assert_eq!(body["thumbnail_type"], "none");
    assert!(body["video_title"]
        .as_str()
        .unwrap()
        .starts_with("Spring Sale "));
    assert!(body.get("formats").is_none());
    init.assert_async().await;
    put.assert_async().await;

    let upload_id = body["upload_id"].as_str().unwrap();
    let stored = app.storage_dir.join(format!("videos/{}/ad.mp4", upload_id));
    assert!(stored.exists(), "source video should be kept in storage");

    let upload: Value = app
        .client()
        .get(&format!("/uploads/{}", upload_id))
        .await
        .json();
    assert_eq!(upload["status"], "active");
    assert_eq!(upload["campaign_name"], "Spring Sale");
    assert_eq!(upload["ad_group"], "ag-1");

    let actions = app.log_actions().await;
    assert!(actions.contains(&"youtube_video_upload".to_string()));
    assert!(actions.contains(&"video_uploaded".to_string()));
}

#[tokio::test]
async fn test_upload_sends_telegram_notification_when_configured() {
    let mut app = setup_test_app().await;
    app.store_credentials("youtube", authorized_youtube_credentials())
        .await;
    app.store_credentials("telegram", telegram_credentials()).await;
    let _youtube = mock_youtube_upload(&mut app, "vid777", 1).await;
    let notify = app
        .upstream
        .mock("POST", "/bot123:abc/sendMessage")
        .match_body(Matcher::PartialJson(json!({ "chat_id": "42", "parse_mode": "HTML" })))
        .with_status(200)
        .with_body(r#"{"ok":true,"result":{}}"#)
        .create_async()
        .await;

    let response = app
        .client()
        .post("/upload/video")
        .multipart(local_upload_form("Launch"))
        .await;

    assert_eq!(response.status_code(), 200);
    notify.assert_async().await;
}

#[tokio::test]
async fn test_upload_notification_failure_does_not_fail_upload() {
    let mut app = setup_test_app().await;
    app.store_credentials("youtube", authorized_youtube_credentials())
        .await;
    app.store_credentials("telegram", telegram_credentials()).await;
    let _youtube = mock_youtube_upload(&mut app, "vid778", 1).await;
    let _notify = app
        .upstream
        .mock("POST", "/bot123:abc/sendMessage")
        .with_status(500)
        .create_async()
        .await;

    let response = app
        .client()
        .post("/upload/video")
        .multipart(local_upload_form("Launch"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.count("uploads").await, 1);
}

#[tokio::test]
async fn test_upload_without_youtube_credentials_fails_and_logs() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload/video")
        .multipart(local_upload_form("Spring Sale"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INTEGRATION_NOT_CONFIGURED");
    assert_eq!(app.count("uploads").await, 0);
    assert!(app
        .log_actions()
        .await
        .contains(&"upload_video_error".to_string()));
}

#[tokio::test]
async fn test_upload_rejects_disallowed_content_type() {
    let app = setup_test_app().await;

    let part = axum_test::multipart::Part::bytes(b"MZ".to_vec())
        .file_name("ad.exe")
        .mime_type("application/octet-stream");
    let form = MultipartForm::new()
        .add_text("campaign_name", "Spring Sale")
        .add_part("video_file", part);
    let response = app.client().post("/upload/video").multipart(form).await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_upload_rejects_oversized_video() {
    let app = setup_test_app_with(&[("MAX_VIDEO_SIZE_MB", "1")]).await;

    let part = axum_test::multipart::Part::bytes(vec![0u8; 1024 * 1024 + 1])
        .file_name("ad.mp4")
        .mime_type("video/mp4");
    let form = MultipartForm::new()
        .add_text("campaign_name", "Spring Sale")
        .add_part("video_file", part);
    let response = app.client().post("/upload/video").multipart(form).await;

    assert_eq!(response.status_code(), 413);
}

#[tokio::test]
async fn test_upload_requires_source() {
    let app = setup_test_app().await;
    let client = app.client();

    let local = MultipartForm::new().add_text("campaign_name", "c");
    assert_eq!(
        client
            .post("/upload/video")
            .multipart(local)
            .await
            .status_code(),
        400
    );

    let drive = MultipartForm::new()
        .add_text("campaign_name", "c")
        .add_text("video_source", "drive");
    assert_eq!(
        client
            .post("/upload/video")
            .multipart(drive)
            .await
            .status_code(),
        400
    );
}

#[tokio::test]
async fn test_custom_modal_thumbnail_requires_known_modal() {
    let app = setup_test_app().await;

    let missing_id = local_upload_form("c").add_text("thumbnail_option", "custom_modal");
    let response = app.client().post("/upload/video").multipart(missing_id).await;
    assert_eq!(response.status_code(), 400);

    let unknown = MultipartForm::new()
        .add_text("campaign_name", "c")
        .add_text("thumbnail_option", "custom_modal")
        .add_text("modal_image_id", "00000000-0000-0000-0000-000000000009")
        .add_part("video_file", video_part("ad.mp4"));
    let response = app.client().post("/upload/video").multipart(unknown).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_batch_upload_reports_each_item() {
    let mut app = setup_test_app().await;
    app.store_credentials("youtube", authorized_youtube_credentials())
        .await;
    let (init, _put) = mock_youtube_upload(&mut app, "batchvid", 2).await;

    let form = MultipartForm::new()
        .add_text("campaign_name", "Batch")
        .add_part("video_files", video_part("one.mp4"))
        .add_part("video_files", video_part("two.mp4"))
        .add_part(
            "video_files",
            axum_test::multipart::Part::bytes(b"nope".to_vec())
                .file_name("three.txt")
                .mime_type("text/plain"),
        );
    let response = app.client().post("/upload/batch").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total"], 3);
    assert_eq!(body["succeeded"], 2);
    assert_eq!(body["failed"], 1);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["filename"], "one.mp4");
    assert!(results[0]["video_title"].as_str().unwrap().ends_with(" #1"));
    assert!(results[1]["video_title"].as_str().unwrap().ends_with(" #2"));
    assert_eq!(results[2]["success"], false);
    assert!(results[2]["error"].is_string());
    init.assert_async().await;

    assert_eq!(app.count("uploads").await, 2);
    assert!(app
        .log_actions()
        .await
        .contains(&"batch_item_error".to_string()));
}

#[tokio::test]
async fn test_batch_upload_enforces_file_limit() {
    let app = setup_test_app_with(&[("MAX_BATCH_FILES", "1")]).await;

    let form = MultipartForm::new()
        .add_text("campaign_name", "Batch")
        .add_part("video_files", video_part("one.mp4"))
        .add_part("video_files", video_part("two.mp4"));
    let response = app.client().post("/upload/batch").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert!(app
        .log_actions()
        .await
        .contains(&"upload_batch_error".to_string()));
}

async fn insert_upload(app: &TestApp) -> String {
    let id = uuid::Uuid::new_v4();
    sqlx::query(
        "INSERT INTO uploads (id, youtube_url, video_title, campaign_name) VALUES ($1, $2, $3, $4)",
    )
    .bind(id)
    .bind("https://www.youtube.com/watch?v=seeded")
    .bind("Seeded 01-01-26")
    .bind("Seeded")
    .execute(app.pool())
    .await
    .unwrap();
    id.to_string()
}

#[tokio::test]
async fn test_update_upload_status() {
    let app = setup_test_app().await;
    let id = insert_upload(&app).await;

    let response = app
        .client()
        .put(&format!("/uploads/{}/status", id))
        .json(&json!({ "status": "banned" }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["success"], true);

    let upload: Value = app.client().get(&format!("/uploads/{}", id)).await.json();
    assert_eq!(upload["status"], "banned");
    assert!(upload["updated_at"].is_string());

    let unknown = app
        .client()
        .put("/uploads/00000000-0000-0000-0000-000000000002/status")
        .json(&json!({ "status": "limited" }))
        .await;
    assert_eq!(unknown.status_code(), 200);
    assert_eq!(unknown.json::<Value>()["success"], false);

    let invalid = app
        .client()
        .put(&format!("/uploads/{}/status", id))
        .json(&json!({ "status": "deleted" }))
        .await;
    assert_eq!(invalid.status_code(), 400);
}

#[tokio::test]
async fn test_update_upload_performance() {
    let app = setup_test_app().await;
    let id = insert_upload(&app).await;

    let metrics = json!({ "ctr": 0.042, "installs": 120 });
    let response = app
        .client()
        .put(&format!("/uploads/{}/performance", id))
        .json(&metrics)
        .await;
    assert_eq!(response.status_code(), 200);

    let upload: Value = app.client().get(&format!("/uploads/{}", id)).await.json();
    assert_eq!(upload["metrics"], metrics);

    let not_object = app
        .client()
        .put(&format!("/uploads/{}/performance", id))
        .json(&json!([1, 2, 3]))
        .await;
    assert_eq!(not_object.status_code(), 400);
}

#[tokio::test]
async fn test_list_uploads() {
    let app = setup_test_app().await;
    let first = insert_upload(&app).await;
    let second = insert_upload(&app).await;

    let body: Value = app.client().get("/uploads").await.json();
    let uploads = body["uploads"].as_array().unwrap();
    assert_eq!(uploads.len(), 2);
    let ids: Vec<_> = uploads.iter().map(|u| u["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&first.as_str()));
    assert!(ids.contains(&second.as_str()));
}

#[tokio::test]
async fn test_custom_modal_upload_without_ffmpeg_skips_thumbnail() {
    let mut app = setup_test_app().await;
    app.store_credentials("youtube", authorized_youtube_credentials())
        .await;

    let form = MultipartForm::new().add_part("image", png_part("overlay.png", create_test_png(40, 40)));
    let modal: Value = app.client().post("/upload/modal").multipart(form).await.json();
    let modal_id = modal["modal_id"].as_str().unwrap().to_string();

    let _youtube = mock_youtube_upload(&mut app, "modalvid", 1).await;
    let form = local_upload_form("Modal")
        .add_text("thumbnail_option", "custom_modal")
        .add_text("modal_image_id", modal_id.as_str());
    let response = app.client().post("/upload/video").multipart(form).await;

    // Frame extraction needs ffmpeg, so the upload continues without a thumbnail
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["thumbnail_type"], "custom_modal");
}

#[tokio::test]
async fn test_create_formats_publishes_variants_and_reports_failures() {
    let mut app = setup_test_app().await;
    app.store_credentials("youtube", authorized_youtube_credentials())
        .await;
    let main = mock_youtube_title(
        &mut app,
        r#""title":"Formats \d{2}-\d{2}-\d{2}""#,
        "mainvid",
        200,
    )
    .await;
    let vertical = mock_youtube_title(&mut app, r"\[vertical\]", "vertvid", 200).await;
    let square = mock_youtube_title(&mut app, r"\[square\]", "unused", 500).await;

    let form = local_upload_form("Formats")
        .add_text("create_formats", "true")
        .add_text("source_orientation", "horizontal");
    let response = app.client().post("/upload/video").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["youtube_url"], "https://www.youtube.com/watch?v=mainvid");
    main.assert_async().await;
    vertical.assert_async().await;
    square.assert_async().await;

    // Without ffmpeg each variant is a copy of the source
    let formats = body["formats"].as_array().unwrap();
    assert_eq!(formats.len(), 2);
    assert_eq!(formats[0]["orientation"], "vertical");
    assert_eq!(formats[0]["success"], true);
    assert_eq!(formats[0]["letterboxed"], false);
    assert_eq!(
        formats[0]["youtube_url"],
        "https://www.youtube.com/watch?v=vertvid"
    );
    assert_eq!(formats[1]["orientation"], "square");
    assert_eq!(formats[1]["success"], false);
    assert!(formats[1]["error"].is_string());

    let variant_id = formats[0]["upload_id"].as_str().unwrap();
    let variant: Value = app
        .client()
        .get(&format!("/uploads/{}", variant_id))
        .await
        .json();
    assert!(variant["video_title"]
        .as_str()
        .unwrap()
        .ends_with(" [vertical]"));
    assert_eq!(variant["thumbnail_type"], "none");
    assert_eq!(app.count("uploads").await, 2);
    assert!(app
        .log_actions()
        .await
        .contains(&"youtube_video_upload_error".to_string()));
}

async fn mock_drive_file(app: &mut TestApp, file_id: &str, name: &str, size: usize) -> Mock {
    app.upstream
        .mock("GET", format!("/drive/v3/files/{}", file_id).as_str())
        .match_query(Matcher::UrlEncoded(
            "fields".into(),
            "id,name,mimeType,size".into(),
        ))
        .with_status(200)
        .with_body(
            json!({
                "id": file_id,
                "name": name,
                "mimeType": "video/mp4",
                "size": size.to_string(),
            })
            .to_string(),
        )
        .create_async()
        .await
}

#[tokio::test]
async fn test_drive_upload_downloads_and_publishes() {
    let mut app = setup_test_app().await;
    app.store_credentials("youtube", authorized_youtube_credentials())
        .await;
    app.store_credentials("google_drive", authorized_drive_credentials())
        .await;
    let video = fake_video();
    let _metadata =
        mock_drive_file(&mut app, "driveFile123", "Ad (final).mp4", video.len()).await;
    let media = app
        .upstream
        .mock("GET", "/drive/v3/files/driveFile123")
        .match_query(Matcher::UrlEncoded("alt".into(), "media".into()))
        .match_header("authorization", "Bearer access-token")
        .with_status(200)
        .with_body(video)
        .create_async()
        .await;
    let (init, _put) = mock_youtube_upload(&mut app, "drivevid", 1).await;

    let form = MultipartForm::new()
        .add_text("campaign_name", "Drive Promo")
        .add_text("video_source", "drive")
        .add_text(
            "drive_url",
            "https://drive.google.com/file/d/driveFile123/view?usp=sharing",
        );
    let response = app.client().post("/upload/video").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["youtube_url"], "https://www.youtube.com/watch?v=drivevid");
    media.assert_async().await;
    init.assert_async().await;

    assert_eq!(app.count("uploads").await, 1);
    let actions = app.log_actions().await;
    assert!(actions.contains(&"google_drive_file_download".to_string()));
    assert!(actions.contains(&"video_uploaded".to_string()));
}

#[tokio::test]
async fn test_drive_upload_rejects_oversized_file_before_download() {
    let mut app = setup_test_app_with(&[("MAX_VIDEO_SIZE_MB", "1")]).await;
    app.store_credentials("youtube", authorized_youtube_credentials())
        .await;
    app.store_credentials("google_drive", authorized_drive_credentials())
        .await;
    let _metadata =
        mock_drive_file(&mut app, "bigFile12345", "big.mp4", 5 * 1024 * 1024).await;
    let media = app
        .upstream
        .mock("GET", "/drive/v3/files/bigFile12345")
        .match_query(Matcher::UrlEncoded("alt".into(), "media".into()))
        .expect(0)
        .create_async()
        .await;

    let form = MultipartForm::new()
        .add_text("campaign_name", "Drive Promo")
        .add_text("video_source", "drive")
        .add_text("drive_url", "bigFile12345");
    let response = app.client().post("/upload/video").multipart(form).await;

    assert_eq!(response.status_code(), 413);
    media.assert_async().await;
    assert_eq!(app.count("uploads").await, 0);
    let actions = app.log_actions().await;
    assert!(actions.contains(&"google_drive_file_download_error".to_string()));
    assert!(actions.contains(&"upload_video_error".to_string()));
}
