/// Album and photo descriptors
///
/// These structs mirror the JSON files an album generator writes next to
/// the photos. They are validated on arrival (required fields present,
/// shapes sane) and never mutated afterwards.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Required keys of the album descriptor root
const ALBUM_FIELDS: [&str; 5] = ["title", "footer", "description", "metadataDir", "photos"];

/// Required keys of every entry in `photos`
const SUMMARY_FIELDS: [&str; 3] = ["name", "thumbnail", "orientation"];

/// Required keys of a photo descriptor
const PHOTO_FIELDS: [&str; 5] = ["photo", "width", "height", "properties", "caption"];

/// A descriptor failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("{0} is not a JSON object")]
    NotAnObject(String),

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("invalid field: {0}")]
    InvalidField(String),
}

/// Thumbnail shape, used to pick the thumbnail frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl From<String> for Orientation {
    /// Anything but "vertical" is laid out as horizontal
    fn from(value: String) -> Self {
        if value == "vertical" {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }
}

/// One entry of the album's photo list. Its position defines the page number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhotoSummary {
    /// Photo name, percent-encoded, without the `.json` suffix
    pub name: String,
    /// Thumbnail path relative to the album directory
    #[serde(rename = "thumbnail")]
    pub thumbnail_path: String,
    #[serde(deserialize_with = "deserialize_orientation")]
    pub orientation: Orientation,
}

/// The album descriptor (`{albumId}.json`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDescriptor {
    pub title: String,
    pub footer: String,
    pub description: String,
    /// Directory holding the photo descriptors, relative to the album directory
    pub metadata_dir: String,
    /// Ordered photo list; page `n` is `photos[n - 1]`
    pub photos: Vec<PhotoSummary>,
}

/// A photo descriptor (`{metadataDir}{name}.json`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhotoDescriptor {
    /// Path to the full-size image relative to the album directory
    #[serde(rename = "photo")]
    pub photo_path: String,
    #[serde(deserialize_with = "deserialize_dimension")]
    pub width: u32,
    #[serde(deserialize_with = "deserialize_dimension")]
    pub height: u32,
    /// Ordered (label, value) pairs, e.g. ("Exposure", "1/250s")
    pub properties: Vec<(String, String)>,
    /// Caption paragraphs
    pub caption: Vec<String>,
}

impl AlbumDescriptor {
    /// Validate and convert a parsed album descriptor
    pub fn from_json(value: &Value) -> Result<Self, DescriptorError> {
        require_fields(value, &ALBUM_FIELDS, "album")?;
        let photos = value["photos"]
            .as_array()
            .ok_or_else(|| DescriptorError::InvalidField("photos is not a list".to_string()))?;
        for (index, summary) in photos.iter().enumerate() {
            require_fields(summary, &SUMMARY_FIELDS, &format!("photos[{}]", index))?;
        }

        AlbumDescriptor::deserialize(value)
            .map_err(|e| DescriptorError::InvalidField(e.to_string()))
    }

    /// Number of photo pages (pages are numbered 1..=count)
    pub fn photo_count(&self) -> u32 {
        self.photos.len() as u32
    }

    /// Summary for a 1-based page number
    pub fn summary(&self, page: u32) -> Option<&PhotoSummary> {
        let index = page.checked_sub(1)? as usize;
        self.photos.get(index)
    }
}

impl PhotoDescriptor {
    /// Validate and convert a parsed photo descriptor
    pub fn from_json(value: &Value) -> Result<Self, DescriptorError> {
        require_fields(value, &PHOTO_FIELDS, "photo")?;
        let photo = PhotoDescriptor::deserialize(value)
            .map_err(|e| DescriptorError::InvalidField(e.to_string()))?;

        // Zero dimensions would poison the aspect ratio
        if photo.width == 0 || photo.height == 0 {
            return Err(DescriptorError::InvalidField(format!(
                "photo dimensions {}x{} must be non-zero",
                photo.width, photo.height
            )));
        }

        Ok(photo)
    }
}

/// Check presence of required keys. `context` prefixes the reported field path.
fn require_fields(value: &Value, fields: &[&str], context: &str) -> Result<(), DescriptorError> {
    let object = value
        .as_object()
        .ok_or_else(|| DescriptorError::NotAnObject(context.to_string()))?;

    for field in fields {
        if !object.contains_key(*field) {
            return Err(DescriptorError::MissingField(format!("{}.{}", context, field)));
        }
    }

    Ok(())
}

fn deserialize_orientation<'de, D>(deserializer: D) -> Result<Orientation, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Orientation::from)
}

/// Album generators write dimensions as decimal strings; accept numbers too
fn deserialize_dimension<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Dimension {
        Number(u32),
        Text(String),
    }

    match Dimension::deserialize(deserializer)? {
        Dimension::Number(value) => Ok(value),
        Dimension::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("`{}` is not a dimension", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_album() -> Value {
        json!({
            "title": "Trip",
            "footer": "(c) me",
            "description": "A short trip",
            "metadataDir": "trip/",
            "photos": [
                {"name": "a", "thumbnail": "thumbs/a.jpg", "orientation": "horizontal",
                 "path": "/x/a.jpg"},
                {"name": "b", "thumbnail": "thumbs/b.jpg", "orientation": "vertical"}
            ]
        })
    }

    #[test]
    fn test_album_parses_and_ignores_extra_fields() {
        let album = AlbumDescriptor::from_json(&sample_album()).unwrap();
        assert_eq!(album.title, "Trip");
        assert_eq!(album.metadata_dir, "trip/");
        assert_eq!(album.photo_count(), 2);
        assert_eq!(album.photos[1].orientation, Orientation::Vertical);
        assert_eq!(album.summary(1).unwrap().thumbnail_path, "thumbs/a.jpg");
        assert!(album.summary(0).is_none());
        assert!(album.summary(3).is_none());
    }

    #[test]
    fn test_album_missing_field() {
        let mut value = sample_album();
        value.as_object_mut().unwrap().remove("footer");
        assert_eq!(
            AlbumDescriptor::from_json(&value),
            Err(DescriptorError::MissingField("album.footer".to_string()))
        );
    }

    #[test]
    fn test_album_summary_missing_field() {
        let mut value = sample_album();
        value["photos"][1].as_object_mut().unwrap().remove("thumbnail");
        assert_eq!(
            AlbumDescriptor::from_json(&value),
            Err(DescriptorError::MissingField("photos[1].thumbnail".to_string()))
        );
    }

    #[test]
    fn test_album_not_an_object() {
        assert!(matches!(
            AlbumDescriptor::from_json(&json!([1, 2])),
            Err(DescriptorError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_photo_accepts_string_dimensions() {
        let value = json!({
            "photo": "photos/a.jpg",
            "width": "1600",
            "height": 1200,
            "properties": [["Exposure", "1/250s"], ["Aperture", "f/8"]],
            "caption": ["Sunset", "Over the bay"]
        });
        let photo = PhotoDescriptor::from_json(&value).unwrap();
        assert_eq!(photo.width, 1600);
        assert_eq!(photo.height, 1200);
        assert_eq!(photo.properties[0], ("Exposure".to_string(), "1/250s".to_string()));
        assert_eq!(photo.caption.len(), 2);
    }

    #[test]
    fn test_photo_rejects_bad_dimensions() {
        let value = json!({
            "photo": "a.jpg", "width": "wide", "height": "1",
            "properties": [], "caption": []
        });
        assert!(matches!(
            PhotoDescriptor::from_json(&value),
            Err(DescriptorError::InvalidField(_))
        ));

        let zero = json!({
            "photo": "a.jpg", "width": 0, "height": 10,
            "properties": [], "caption": []
        });
        assert!(matches!(
            PhotoDescriptor::from_json(&zero),
            Err(DescriptorError::InvalidField(_))
        ));
    }

    #[test]
    fn test_photo_missing_caption() {
        let value = json!({"photo": "a.jpg", "width": 1, "height": 1, "properties": []});
        assert_eq!(
            PhotoDescriptor::from_json(&value),
            Err(DescriptorError::MissingField("photo.caption".to_string()))
        );
    }
}
