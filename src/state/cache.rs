use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::data::{AlbumDescriptor, PhotoDescriptor};
use super::paths::AlbumPaths;
use crate::error::ResourceError;
use crate::fetch::FetchError;

/// Identifies which album visit a fetch belongs to.
///
/// `epoch` changes every time the cache is cleared, so a response issued
/// for an earlier visit of the same album id is recognised as stale too.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlbumTag {
    pub album_id: String,
    pub epoch: u64,
}

/// Tag of a photo descriptor fetch: the album visit plus the page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoTag {
    pub album: AlbumTag,
    pub page: u32,
}

/// An album descriptor fetch the caller must issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRequest {
    pub tag: AlbumTag,
    pub uri: String,
}

/// A photo descriptor fetch the caller must issue.
/// `fatal` is set when the current view depends on the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRequest {
    pub tag: PhotoTag,
    pub uri: String,
    pub fatal: bool,
}

/// Result of `MetadataCache::get_photo`
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoLookup {
    Present(Arc<PhotoDescriptor>),
    InFlight,
    Absent,
}

/// What happened when an album fetch completed
#[derive(Debug, Clone)]
pub enum AlbumCompletion {
    /// The album was switched (or reloaded) since the fetch was issued
    Stale,
    Loaded(Arc<AlbumDescriptor>),
    Failed(ResourceError),
}

/// What happened when a photo fetch completed
#[derive(Debug, Clone)]
pub enum PhotoCompletion {
    Stale,
    /// Descriptor stored. `preload` holds the pixel URI to warm when the
    /// fetch was a prefetch.
    Stored {
        page: u32,
        photo: Arc<PhotoDescriptor>,
        preload: Option<String>,
    },
    /// Fetch or validation failed. The slot is Absent again.
    Failed {
        page: u32,
        fatal: bool,
        error: ResourceError,
    },
}

#[derive(Debug, Clone)]
enum AlbumSlot {
    Absent,
    InFlight,
    Present(Arc<AlbumDescriptor>),
}

#[derive(Debug, Clone)]
enum PhotoSlot {
    InFlight,
    Present(Arc<PhotoDescriptor>),
}

/// Session-scoped store of the current album and its photo descriptors.
///
/// Photo slots are keyed by page number and are only valid for the album
/// currently held; switching albums drops everything at once. Entries are
/// never evicted individually. At most one fetch per page is in flight.
#[derive(Debug)]
pub struct MetadataCache {
    paths: Option<AlbumPaths>,
    epoch: u64,
    album: AlbumSlot,
    pages: HashMap<u32, PhotoSlot>,
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataCache {
    pub fn new() -> Self {
        Self {
            paths: None,
            epoch: 0,
            album: AlbumSlot::Absent,
            pages: HashMap::new(),
        }
    }

    /// Album id the cache currently belongs to (loaded or in flight)
    pub fn album_id(&self) -> Option<&str> {
        self.paths.as_ref().map(|paths| paths.album_id())
    }

    pub fn paths(&self) -> Option<&AlbumPaths> {
        self.paths.as_ref()
    }

    /// The loaded album descriptor, if the load has completed
    pub fn album(&self) -> Option<&Arc<AlbumDescriptor>> {
        match &self.album {
            AlbumSlot::Present(album) => Some(album),
            _ => None,
        }
    }

    /// True when `album_id` is loaded or currently loading
    pub fn holds(&self, album_id: &str) -> bool {
        self.album_id() == Some(album_id) && !matches!(self.album, AlbumSlot::Absent)
    }

    fn current_tag(&self) -> Option<AlbumTag> {
        self.album_id().map(|album_id| AlbumTag {
            album_id: album_id.to_string(),
            epoch: self.epoch,
        })
    }

    /// Start loading an album.
    ///
    /// No-op when this album is already loaded or loading. Otherwise the
    /// previous album and every photo slot are discarded before the request
    /// is handed out.
    pub fn load_album(&mut self, album_id: &str) -> Option<AlbumRequest> {
        if self.holds(album_id) {
            return None;
        }

        self.pages.clear();
        self.epoch += 1;
        let paths = AlbumPaths::new(album_id);
        let uri = paths.album_descriptor();
        self.paths = Some(paths);
        self.album = AlbumSlot::InFlight;
        debug!("Cache cleared for album '{}' (epoch {})", album_id, self.epoch);

        Some(AlbumRequest {
            tag: AlbumTag {
                album_id: album_id.to_string(),
                epoch: self.epoch,
            },
            uri,
        })
    }

    /// Record the outcome of an album fetch
    pub fn complete_album(
        &mut self,
        tag: &AlbumTag,
        result: Result<Value, FetchError>,
    ) -> AlbumCompletion {
        if self.current_tag().as_ref() != Some(tag) || !matches!(self.album, AlbumSlot::InFlight) {
            return AlbumCompletion::Stale;
        }

        let parsed = result
            .map_err(ResourceError::from)
            .and_then(|value| AlbumDescriptor::from_json(&value).map_err(ResourceError::from));

        match parsed {
            Ok(album) => {
                let album = Arc::new(album);
                self.album = AlbumSlot::Present(album.clone());
                AlbumCompletion::Loaded(album)
            }
            Err(error) => {
                self.album = AlbumSlot::Absent;
                AlbumCompletion::Failed(error)
            }
        }
    }

    pub fn get_photo(&self, page: u32) -> PhotoLookup {
        match self.pages.get(&page) {
            Some(PhotoSlot::Present(photo)) => PhotoLookup::Present(photo.clone()),
            Some(PhotoSlot::InFlight) => PhotoLookup::InFlight,
            None => PhotoLookup::Absent,
        }
    }

    /// Issue a photo descriptor fetch.
    ///
    /// Returns `None` unless the album is loaded, the page exists and its
    /// slot is Absent. On `Some` the slot is InFlight.
    pub fn fetch_photo(&mut self, page: u32, fatal: bool) -> Option<PhotoRequest> {
        if self.get_photo(page) != PhotoLookup::Absent {
            return None;
        }
        let album = self.album()?;
        let uri = self.paths.as_ref()?.photo_descriptor(album, page)?;
        let tag = PhotoTag {
            album: self.current_tag()?,
            page,
        };

        self.pages.insert(page, PhotoSlot::InFlight);
        Some(PhotoRequest { tag, uri, fatal })
    }

    /// Prefetch the page after `page` if it exists and is not cached
    pub fn prefetch_after(&mut self, page: u32) -> Option<PhotoRequest> {
        let next = page.checked_add(1)?;
        if next > self.album()?.photo_count() {
            return None;
        }
        self.fetch_photo(next, false)
    }

    /// Record the outcome of a photo fetch.
    ///
    /// Responses for another album visit are dropped. Successful responses
    /// for this album are always stored, whether or not anyone still waits
    /// for the page.
    pub fn complete_photo(
        &mut self,
        request: &PhotoRequest,
        result: Result<Value, FetchError>,
    ) -> PhotoCompletion {
        if self.current_tag().as_ref() != Some(&request.tag.album) {
            return PhotoCompletion::Stale;
        }
        let page = request.tag.page;

        // Descriptors are immutable once stored
        if let Some(PhotoSlot::Present(photo)) = self.pages.get(&page) {
            return PhotoCompletion::Stored {
                page,
                photo: photo.clone(),
                preload: None,
            };
        }

        let parsed = result
            .map_err(ResourceError::from)
            .and_then(|value| PhotoDescriptor::from_json(&value).map_err(ResourceError::from));

        match parsed {
            Ok(photo) => {
                let photo = Arc::new(photo);
                self.pages.insert(page, PhotoSlot::Present(photo.clone()));
                let preload = if request.fatal {
                    None
                } else {
                    self.paths
                        .as_ref()
                        .map(|paths| paths.resource(&photo.photo_path))
                };
                PhotoCompletion::Stored {
                    page,
                    photo,
                    preload,
                }
            }
            Err(error) => {
                self.pages.remove(&page);
                if !request.fatal {
                    warn!("⚠️  Prefetch of page {} failed: {}", page, error);
                }
                PhotoCompletion::Failed {
                    page,
                    fatal: request.fatal,
                    error,
                }
            }
        }
    }
}
