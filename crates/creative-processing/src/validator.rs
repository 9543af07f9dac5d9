use std::path::Path;

/// Validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("File has no extension: {0}")]
    MissingExtension(String),

    #[error("Empty file")]
    EmptyFile,
}

/// Upload validator for one media kind (videos or modal images)
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

/// Lowercase MIME type without parameters (`video/mp4; codecs=avc1` -> `video/mp4`)
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

impl MediaValidator {
    pub fn new(
        max_file_size: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
            allowed_content_types,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Reject names that are empty or could address another directory
    pub fn validate_filename(&self, filename: &str) -> Result<(), ValidationError> {
        let trimmed = filename.trim();
        if trimmed.is_empty()
            || trimmed.contains("..")
            || trimmed.contains('/')
            || trimmed.contains('\\')
            || trimmed.contains('\0')
        {
            return Err(ValidationError::InvalidFilename(filename.to_string()));
        }
        Ok(())
    }

    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = normalize_content_type(content_type);

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Size, filename, extension and MIME type, in that order
    pub fn validate_all(
        &self,
        filename: &str,
        content_type: &str,
        file_size: usize,
    ) -> Result<(), ValidationError> {
        self.validate_file_size(file_size)?;
        self.validate_filename(filename)?;
        self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_validator() -> MediaValidator {
        MediaValidator::new(
            1024,
            vec!["mp4".into(), "mov".into()],
            vec!["video/mp4".into(), "video/quicktime".into()],
        )
    }

    #[test]
    fn test_accepts_valid_upload() {
        let v = video_validator();
        assert!(v.validate_all("ad.MP4", "video/mp4", 10).is_ok());
        assert!(v
            .validate_all("ad.mov", "Video/QuickTime; charset=binary", 10)
            .is_ok());
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        let v = video_validator();
        assert!(matches!(
            v.validate_all("ad.mp4", "video/mp4", 0),
            Err(ValidationError::EmptyFile)
        ));
        assert!(matches!(
            v.validate_all("ad.mp4", "video/mp4", 1025),
            Err(ValidationError::FileTooLarge {
                size: 1025,
                max: 1024
            })
        ));
    }

    #[test]
    fn test_rejects_bad_names() {
        let v = video_validator();
        assert!(matches!(
            v.validate_all("../ad.mp4", "video/mp4", 10),
            Err(ValidationError::InvalidFilename(_))
        ));
        assert!(matches!(
            v.validate_all("ad", "video/mp4", 10),
            Err(ValidationError::MissingExtension(_))
        ));
        assert!(matches!(
            v.validate_all("ad.exe", "video/mp4", 10),
            Err(ValidationError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_rejects_content_type_outside_allowlist() {
        let v = video_validator();
        assert!(matches!(
            v.validate_all("ad.mp4", "application/octet-stream", 10),
            Err(ValidationError::InvalidContentType { .. })
        ));
    }

    #[test]
    fn test_normalize_content_type() {
        assert_eq!(normalize_content_type("Video/MP4; codecs=avc1"), "video/mp4");
        assert_eq!(normalize_content_type(""), "");
    }
}
