use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Shown when the reference service has no usable picture for a plant.
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1416879895648-5d6776113f03?w=800";

pub const UNKNOWN_COMMON_NAME: &str = "Unknown";

/// A free-text plant name, never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantQuery(String);

impl PlantQuery {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlantQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Perenual species-list payload. Fields are read loosely: a value of the
// wrong shape becomes absent instead of failing the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeciesListResponse {
    #[serde(default, deserialize_with = "lenient_records")]
    pub data: Option<Vec<PlantData>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlantData {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub common_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub scientific_name: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub other_name: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cycle: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub watering: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub sunlight: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_image")]
    pub default_image: Option<DefaultImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultImage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub original_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub regular_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub medium_url: Option<String>,
}

fn lenient_records<'de, D>(deserializer: D) -> Result<Option<Vec<PlantData>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(None),
    };

    let records = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<PlantData>(item) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("⚠️ Skipping unreadable plant record: {}", e);
                None
            }
        })
        .collect();

    Ok(Some(records))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(vec![s]),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_image<'de, D>(deserializer: D) -> Result<Option<DefaultImage>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

/// Display-ready plant information.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantRecord {
    pub id: Option<u64>,
    pub common_name: String,
    pub scientific_names: Vec<String>,
    pub other_names: Vec<String>,
    pub cycle: Option<String>,
    pub watering: Option<String>,
    pub sunlight: Vec<String>,
    /// Always set: regular, then medium, then [`DEFAULT_IMAGE_URL`].
    pub image_url: String,
    pub original_image_url: Option<String>,
}

impl PlantRecord {
    pub fn primary_scientific_name(&self) -> Option<&str> {
        self.scientific_names.first().map(String::as_str)
    }

    pub fn watering_level(&self) -> Option<WateringLevel> {
        self.watering.as_deref().map(WateringLevel::from_string)
    }

    pub fn sunlight_levels(&self) -> Vec<SunlightLevel> {
        self.sunlight.iter().map(|s| SunlightLevel::from_string(s)).collect()
    }
}

impl From<PlantData> for PlantRecord {
    fn from(data: PlantData) -> Self {
        let image = data.default_image.unwrap_or_default();
        let image_url = non_blank(image.regular_url)
            .or_else(|| non_blank(image.medium_url))
            .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string());

        Self {
            id: data.id,
            common_name: non_blank(data.common_name)
                .unwrap_or_else(|| UNKNOWN_COMMON_NAME.to_string()),
            scientific_names: data.scientific_name.unwrap_or_default(),
            other_names: data.other_name.unwrap_or_default(),
            cycle: non_blank(data.cycle),
            watering: non_blank(data.watering),
            sunlight: data.sunlight.unwrap_or_default(),
            image_url,
            original_image_url: non_blank(image.original_url),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WateringLevel {
    Frequent,
    Average,
    Minimum,
    None,
    Other(String),
}

impl WateringLevel {
    pub fn from_string(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "frequent" => WateringLevel::Frequent,
            "average" => WateringLevel::Average,
            "minimum" => WateringLevel::Minimum,
            "none" => WateringLevel::None,
            _ => WateringLevel::Other(s.trim().to_string()),
        }
    }
}

impl std::fmt::Display for WateringLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WateringLevel::Frequent => "Frequent",
            WateringLevel::Average => "Average",
            WateringLevel::Minimum => "Minimum",
            WateringLevel::None => "None",
            WateringLevel::Other(other) => other.as_str(),
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SunlightLevel {
    FullSun,
    PartShade,
    FullShade,
    Other(String),
}

impl SunlightLevel {
    pub fn from_string(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "full sun" => SunlightLevel::FullSun,
            "part shade" | "part sun/part shade" => SunlightLevel::PartShade,
            "full shade" => SunlightLevel::FullShade,
            _ => SunlightLevel::Other(s.trim().to_string()),
        }
    }
}

impl std::fmt::Display for SunlightLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SunlightLevel::FullSun => "Full sun",
            SunlightLevel::PartShade => "Part shade",
            SunlightLevel::FullShade => "Full shade",
            SunlightLevel::Other(other) => other.as_str(),
        };
        write!(f, "{}", s)
    }
}

/// Best-effort plant name produced from an image. Not a verified identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdentificationResult(String);

impl IdentificationResult {
    /// Trims the completion text; `None` if nothing is left.
    pub fn from_completion(text: &str) -> Option<Self> {
        let name = text.trim();
        if name.is_empty() {
            None
        } else {
            Some(Self(name.to_string()))
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn into_name(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Upload,
    Capture,
}

/// Raw image bytes plus the MIME type implied by where they came from.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub source: ImageSource,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, source: ImageSource) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            source,
        }
    }

    /// Uploaded file; the MIME type comes from the file extension.
    pub fn from_upload(bytes: Vec<u8>, file_name: &str) -> Self {
        Self::new(bytes, mime_from_file_name(file_name), ImageSource::Upload)
    }

    /// Camera snapshots arrive as JPEG.
    pub fn from_capture(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/jpeg", ImageSource::Capture)
    }
}

fn mime_from_file_name(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".gif") {
        "image/gif"
    } else {
        // .jpg, .jpeg and anything unrecognised
        "image/jpeg"
    }
}
