use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

use super::ThumbnailType;

/// Aspect ratio tolerance within which a video counts as square
const SQUARE_TOLERANCE: f64 = 0.05;

/// Aspect ratio class of a video, used to pick letterbox targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Square,
    Horizontal,
}

impl Orientation {
    /// Derivation order of letterboxed variants
    pub const ALL: [Orientation; 3] = [
        Orientation::Vertical,
        Orientation::Square,
        Orientation::Horizontal,
    ];

    /// Classify by aspect ratio. Degenerate sizes (a zero side) count as horizontal.
    pub fn classify(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Orientation::Horizontal;
        }
        let ratio = width as f64 / height as f64;
        if (ratio - 1.0).abs() <= SQUARE_TOLERANCE {
            Orientation::Square
        } else if width > height {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    /// Letterbox canvas (width, height)
    pub fn target_dimensions(&self) -> (u32, u32) {
        match self {
            Orientation::Vertical => (1080, 1920),
            Orientation::Square => (1080, 1080),
            Orientation::Horizontal => (1920, 1080),
        }
    }

    /// The two orientations a source of this orientation is converted into
    pub fn others(&self) -> Vec<Orientation> {
        Orientation::ALL
            .into_iter()
            .filter(|o| o != self)
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Square => "square",
            Orientation::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orientation declared by the uploader; `Auto` defers to ffprobe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceOrientation {
    #[default]
    Auto,
    Declared(Orientation),
}

impl FromStr for SourceOrientation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(SourceOrientation::Auto),
            "vertical" => Ok(SourceOrientation::Declared(Orientation::Vertical)),
            "square" => Ok(SourceOrientation::Declared(Orientation::Square)),
            "horizontal" => Ok(SourceOrientation::Declared(Orientation::Horizontal)),
            other => Err(AppError::InvalidInput(format!(
                "Invalid source_orientation '{}'. Expected auto, vertical, square or horizontal",
                other
            ))),
        }
    }
}

/// Where the uploaded video comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSource {
    #[default]
    Local,
    Drive,
}

impl FromStr for VideoSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "local" => Ok(VideoSource::Local),
            "drive" => Ok(VideoSource::Drive),
            other => Err(AppError::InvalidInput(format!(
                "Invalid video_source '{}'. Expected local or drive",
                other
            ))),
        }
    }
}

/// Outcome of one derived format upload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormatUploadResult {
    pub orientation: Orientation,
    pub success: bool,
    pub letterboxed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VideoUploadResponse {
    pub success: bool,
    pub upload_id: Uuid,
    pub youtube_url: String,
    pub video_title: String,
    pub thumbnail_type: ThumbnailType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<FormatUploadResult>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchItemResult {
    pub index: usize,
    pub filename: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchUploadResponse {
    pub success: bool,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_orientation() {
        assert_eq!(Orientation::classify(1920, 1080), Orientation::Horizontal);
        assert_eq!(Orientation::classify(1080, 1920), Orientation::Vertical);
        assert_eq!(Orientation::classify(1080, 1080), Orientation::Square);
        // within 5% of square
        assert_eq!(Orientation::classify(1130, 1080), Orientation::Square);
        assert_eq!(Orientation::classify(1030, 1080), Orientation::Square);
        assert_eq!(Orientation::classify(1200, 1080), Orientation::Horizontal);
        assert_eq!(Orientation::classify(0, 0), Orientation::Horizontal);
    }

    #[test]
    fn test_other_orientations_keep_order() {
        assert_eq!(
            Orientation::Horizontal.others(),
            vec![Orientation::Vertical, Orientation::Square]
        );
        assert_eq!(
            Orientation::Square.others(),
            vec![Orientation::Vertical, Orientation::Horizontal]
        );
        assert_eq!(
            Orientation::Vertical.others(),
            vec![Orientation::Square, Orientation::Horizontal]
        );
    }

    #[test]
    fn test_target_dimensions() {
        assert_eq!(Orientation::Vertical.target_dimensions(), (1080, 1920));
        assert_eq!(Orientation::Square.target_dimensions(), (1080, 1080));
        assert_eq!(Orientation::Horizontal.target_dimensions(), (1920, 1080));
    }

    #[test]
    fn test_parse_form_enums() {
        assert_eq!(
            "auto".parse::<SourceOrientation>().unwrap(),
            SourceOrientation::Auto
        );
        assert_eq!(
            "Square".parse::<SourceOrientation>().unwrap(),
            SourceOrientation::Declared(Orientation::Square)
        );
        assert_eq!("drive".parse::<VideoSource>().unwrap(), VideoSource::Drive);
        assert!("dropbox".parse::<VideoSource>().is_err());
    }
}
