/// Resource locations for one album
///
/// Everything an album references is relative to the album's directory,
/// which is the album id with its last path segment removed:
/// album `2014/trip` lives in `2014/trip.json` and its photos under `2014/`.

use super::data::AlbumDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumPaths {
    album_id: String,
    base: String,
}

impl AlbumPaths {
    pub fn new(album_id: &str) -> Self {
        let base = match album_id.rfind('/') {
            Some(slash) => album_id[..=slash].to_string(),
            None => String::new(),
        };
        Self {
            album_id: album_id.to_string(),
            base,
        }
    }

    pub fn album_id(&self) -> &str {
        &self.album_id
    }

    /// The album descriptor: `{albumId}.json`
    pub fn album_descriptor(&self) -> String {
        format!("{}.json", self.album_id)
    }

    /// Photo descriptor for a 1-based page: `{base}{metadataDir}{name}.json`
    pub fn photo_descriptor(&self, album: &AlbumDescriptor, page: u32) -> Option<String> {
        let summary = album.summary(page)?;
        Some(format!(
            "{}{}{}.json",
            self.base, album.metadata_dir, summary.name
        ))
    }

    /// A photo or thumbnail path from a descriptor, resolved against the base
    pub fn resource(&self, relative: &str) -> String {
        format!("{}{}", self.base, relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{Orientation, PhotoSummary};

    fn album() -> AlbumDescriptor {
        AlbumDescriptor {
            title: "t".into(),
            footer: "f".into(),
            description: "d".into(),
            metadata_dir: "meta/".into(),
            photos: vec![PhotoSummary {
                name: "IMG%201".into(),
                thumbnail_path: "thumbs/1.jpg".into(),
                orientation: Orientation::Horizontal,
            }],
        }
    }

    #[test]
    fn test_top_level_album() {
        let paths = AlbumPaths::new("trip");
        assert_eq!(paths.album_descriptor(), "trip.json");
        assert_eq!(paths.base, "");
        assert_eq!(paths.photo_descriptor(&album(), 1).unwrap(), "meta/IMG%201.json");
        assert_eq!(paths.resource("photos/1.jpg"), "photos/1.jpg");
    }

    #[test]
    fn test_nested_album() {
        let paths = AlbumPaths::new("2014/trip");
        assert_eq!(paths.album_descriptor(), "2014/trip.json");
        assert_eq!(paths.base, "2014/");
        assert_eq!(paths.photo_descriptor(&album(), 1).unwrap(), "2014/meta/IMG%201.json");
        assert!(paths.photo_descriptor(&album(), 2).is_none());
    }
}
