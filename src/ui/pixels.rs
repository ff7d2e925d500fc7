/// Decoded images for the album being browsed
///
/// Keyed by resource URI and scoped to one album like the metadata cache:
/// when the cache moves to another album, everything held here is dropped.
/// Downloads still running for the old album are ignored when they land.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::layout::{self, Dimensions};
use crate::fetch::FetchError;

#[derive(Debug)]
pub struct PixelStore<H> {
    album_id: Option<String>,
    images: HashMap<String, H>,
    natural_sizes: HashMap<String, Dimensions>,
    loading: HashSet<String>,
}

impl<H> Default for PixelStore<H> {
    fn default() -> Self {
        Self {
            album_id: None,
            images: HashMap::new(),
            natural_sizes: HashMap::new(),
            loading: HashSet::new(),
        }
    }
}

impl<H> PixelStore<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope the store to the album the metadata cache holds
    pub fn follow_album(&mut self, album_id: Option<&str>) {
        if self.album_id.as_deref() == album_id {
            return;
        }
        debug!("Dropping {} images of the previous album", self.images.len());
        self.images.clear();
        self.natural_sizes.clear();
        self.loading.clear();
        self.album_id = album_id.map(str::to_string);
    }

    /// Claim a download. False when the image is held or already loading.
    pub fn begin(&mut self, uri: &str) -> bool {
        !self.images.contains_key(uri) && self.loading.insert(uri.to_string())
    }

    /// Store a finished download, decoding the body with `decode`.
    /// Downloads not claimed for the current album are dropped.
    pub fn finish(
        &mut self,
        uri: &str,
        result: &Result<Vec<u8>, FetchError>,
        decode: impl FnOnce(Vec<u8>) -> H,
    ) {
        if !self.loading.remove(uri) {
            return;
        }
        let Ok(bytes) = result else {
            return;
        };
        if let Some(size) = layout::natural_size_of(bytes) {
            self.natural_sizes.insert(uri.to_string(), size);
        }
        self.images.insert(uri.to_string(), decode(bytes.clone()));
    }

    pub fn get(&self, uri: &str) -> Option<&H> {
        self.images.get(uri)
    }

    /// Size read from the image header, if it decoded
    pub fn natural_size(&self, uri: &str) -> Option<Dimensions> {
        self.natural_sizes.get(uri).copied()
    }
}
