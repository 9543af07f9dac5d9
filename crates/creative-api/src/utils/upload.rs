//! Multipart form parsing shared by the upload handlers

use axum::extract::Multipart;
use bytes::Bytes;
use creative_core::AppError;
use std::collections::HashMap;
use uuid::Uuid;

/// One file part of a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Text fields and file parts of a multipart request, read fully into memory.
///
/// Parts with a filename are files; all others are text. Browsers send an empty file part
/// when no file is selected; such parts are dropped.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<(String, UploadedFile)>,
}

impl MultipartForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
        {
            let name = field.name().map(|s| s.to_string()).unwrap_or_default();

            match field.file_name().map(|s| s.to_string()) {
                Some(filename) => {
                    let content_type = field
                        .content_type()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "application/octet-stream".to_string());
                    let data = field.bytes().await.map_err(|e| {
                        AppError::InvalidInput(format!("Failed to read file data: {}", e))
                    })?;
                    if filename.is_empty() && data.is_empty() {
                        continue;
                    }
                    form.files.push((
                        name,
                        UploadedFile {
                            filename,
                            content_type,
                            data,
                        },
                    ));
                }
                None => {
                    let value = field.text().await.map_err(|e| {
                        AppError::InvalidInput(format!("Failed to read field '{}': {}", name, e))
                    })?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed value of a text field; empty values count as missing
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn required_text(&self, name: &str) -> Result<&str, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::InvalidInput(format!("{} is required", name)))
    }

    /// Checkbox-style boolean: `true`, `1`, `yes` or `on`
    pub fn flag(&self, name: &str) -> bool {
        self.text(name).is_some_and(|v| {
            matches!(
                v.to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )
        })
    }

    /// Optional UUID field
    pub fn uuid(&self, name: &str) -> Result<Option<Uuid>, AppError> {
        self.text(name)
            .map(|v| {
                Uuid::parse_str(v)
                    .map_err(|_| AppError::InvalidInput(format!("{} must be a valid UUID", name)))
            })
            .transpose()
    }

    /// Remove and return the first file sent under `name`
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        let index = self.files.iter().position(|(n, _)| n == name)?;
        Some(self.files.remove(index).1)
    }

    /// Remove and return every file sent under `name`, in request order
    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        let (taken, kept) = std::mem::take(&mut self.files)
            .into_iter()
            .partition::<Vec<_>, _>(|(n, _)| n == name);
        self.files = kept;
        taken.into_iter().map(|(_, file)| file).collect()
    }

    #[cfg(test)]
    pub(crate) fn with(fields: &[(&str, &str)], files: Vec<(&str, UploadedFile)>) -> Self {
        MultipartForm {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: files
                .into_iter()
                .map(|(n, f)| (n.to_string(), f))
                .collect(),
        }
    }
}

/// Sanitize filename to prevent path traversal and invalid characters.
/// Returns an error if the filename contains path traversal attempts.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    const MAX_FILENAME_LENGTH: usize = 255;

    let filename_only = std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if filename_only.contains("..") {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('_').is_empty() || sanitized.len() < 3 {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            content_type: "video/mp4".to_string(),
            data: Bytes::from_static(b"data"),
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("My Ad (final).mp4").unwrap(), "My_Ad__final_.mp4");
        assert_eq!(sanitize_filename("/tmp/uploads/clip.mov").unwrap(), "clip.mov");
        assert_eq!(sanitize_filename("a").unwrap(), "file");
        assert!(sanitize_filename("clip..mp4").is_err());
    }

    #[test]
    fn test_text_fields() {
        let form = MultipartForm::with(
            &[
                ("campaign_name", "  Summer  "),
                ("drive_url", ""),
                ("create_formats", "on"),
                ("modal_image_id", "not-a-uuid"),
            ],
            vec![],
        );
        assert_eq!(form.text("campaign_name"), Some("Summer"));
        assert_eq!(form.text("drive_url"), None);
        assert!(form.required_text("drive_url").is_err());
        assert!(form.flag("create_formats"));
        assert!(!form.flag("missing"));
        assert!(form.uuid("modal_image_id").is_err());
        assert_eq!(form.uuid("missing").unwrap(), None);
    }

    #[test]
    fn test_take_files_keeps_order() {
        let mut form = MultipartForm::with(
            &[],
            vec![
                ("video_files", file("a.mp4")),
                ("image", file("m.png")),
                ("video_files", file("b.mp4")),
            ],
        );
        let videos = form.take_files("video_files");
        assert_eq!(
            videos.iter().map(|f| f.filename.as_str()).collect::<Vec<_>>(),
            vec!["a.mp4", "b.mp4"]
        );
        assert_eq!(form.take_file("image").unwrap().filename, "m.png");
        assert!(form.take_file("image").is_none());
    }
}
