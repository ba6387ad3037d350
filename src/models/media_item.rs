use serde::{Deserialize, Serialize};

/// Media kind, also used as the value of the `types` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Display rotation stored server-side, in clockwise quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(&self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// One quarter turn further in the given direction.
    pub fn rotated(self, clockwise: bool) -> Self {
        let delta: i64 = if clockwise { 90 } else { -90 };
        Self::from_degrees(i64::from(self.degrees()) + delta).unwrap_or_default()
    }

    /// True for 90 and 270, where the displayed width and height swap.
    pub fn is_quarter_turn(&self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }
}

impl TryFrom<i64> for Rotation {
    type Error = String;

    fn try_from(degrees: i64) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
            .ok_or_else(|| format!("rotation must be a multiple of 90, got {degrees}"))
    }
}

impl From<Rotation> for i64 {
    fn from(rotation: Rotation) -> Self {
        i64::from(rotation.degrees())
    }
}

/// One media entry as delivered by `/api/media`.
///
/// The hash travels outside the field object on the wire and is filled in by
/// the collection when the record is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    #[serde(default, skip_serializing)]
    pub hash: String,
    pub name: String,
    #[serde(rename = "video", default)]
    pub is_video: bool,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub aspect_ratio: f64,
    #[serde(rename = "size", default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub date_created: Option<i64>,
    #[serde(default)]
    pub date_modified: Option<i64>,
    #[serde(default)]
    pub rotation: Option<Rotation>,
    #[serde(default)]
    pub path: String,
}

impl MediaRecord {
    /// Minimal record for callers that only care about geometry.
    pub fn new(hash: impl Into<String>, name: impl Into<String>, width: u32, height: u32) -> Self {
        let aspect_ratio = if height == 0 {
            1.0
        } else {
            f64::from(width) / f64::from(height)
        };
        Self {
            hash: hash.into(),
            name: name.into(),
            is_video: false,
            width,
            height,
            aspect_ratio,
            size_bytes: 0,
            duration: None,
            date_created: None,
            date_modified: None,
            rotation: None,
            path: String::new(),
        }
    }

    pub fn media_type(&self) -> MediaType {
        if self.is_video {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }

    /// Rotation with `null` read as upright.
    pub fn effective_rotation(&self) -> Rotation {
        self.rotation.unwrap_or_default()
    }
}
