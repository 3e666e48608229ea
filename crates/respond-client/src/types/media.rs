//! Image and audio types.

use respond_core::to_fixed;
use serde::{Deserialize, Serialize};

/// Kind of image attached to an incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    Photo,
    Satellite,
    Drone,
    Cctv,
    Screenshot,
}

impl ImageType {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageType::Photo => "photo",
            ImageType::Satellite => "satellite",
            ImageType::Drone => "drone",
            ImageType::Cctv => "cctv",
            ImageType::Screenshot => "screenshot",
        }
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(ImageType::Photo),
            "satellite" => Ok(ImageType::Satellite),
            "drone" => Ok(ImageType::Drone),
            "cctv" => Ok(ImageType::Cctv),
            "screenshot" => Ok(ImageType::Screenshot),
            other => Err(format!(
                "unknown image type '{}', expected photo/satellite/drone/cctv/screenshot",
                other
            )),
        }
    }
}

/// Image file extensions the API accepts
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// Audio file extensions the API accepts
pub const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "wav", "m4a", "flac", "ogg", "webm"];

/// Response of `POST /ingest/incident/{id}/image`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    pub incident_id: String,
    pub image_point_id: String,
    pub message: String,
    #[serde(default)]
    pub image_path: Option<String>,
}

/// Response of `POST /memory/incident/{id}/reinforce_audio`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioReinforcementResponse {
    pub incident_id: String,
    pub transcript: String,
    pub similarity: f64,
    pub accepted: bool,
    #[serde(default)]
    pub old_confidence: Option<f64>,
    #[serde(default)]
    pub new_confidence: Option<f64>,
    #[serde(default)]
    pub reinforced_count: Option<u32>,
    pub message: String,
    #[serde(default)]
    pub audio_path: Option<String>,
}

impl AudioReinforcementResponse {
    /// `"0.50 -> 0.65"`, or `"-"` for whichever side the server omitted
    pub fn confidence_change(&self) -> String {
        let fmt = |value: Option<f64>| match value {
            Some(v) => to_fixed(v, 2),
            None => "-".to_string(),
        };
        format!("{} -> {}", fmt(self.old_confidence), fmt(self.new_confidence))
    }
}

/// Body of `POST /search/images`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSearchRequest {
    pub query: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
}

impl ImageSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: 10,
            image_type: None,
            zone_id: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_image_type(mut self, image_type: ImageType) -> Self {
        self.image_type = Some(image_type);
        self
    }
}

/// One image matched by a text query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSearchResult {
    pub image_id: String,
    pub incident_id: String,
    pub image_path: String,
    pub image_type: String,
    pub score: f64,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response of `POST /search/images`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSearchResponse {
    pub query: String,
    pub count: usize,
    #[serde(default)]
    pub results: Vec<ImageSearchResult>,
}

pub(crate) fn has_extension(file_name: &str, allowed: &[&str]) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| allowed.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
