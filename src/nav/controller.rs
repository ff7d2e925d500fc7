/// Navigation state machine
///
/// The controller is sans-IO: it consumes navigation events and fetch
/// completions, paints through a `Renderer`, and returns the fetches the
/// caller must issue. The caller runs those fetches however it likes and
/// feeds each completion back, one at a time, on the same event queue.
///
/// A later navigation always wins over earlier fetches. Nothing is
/// cancelled; completions carry the tag they were issued with and are
/// checked against the live session before they touch the screen.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::fragment::{self, NavigationTarget};
use crate::error::{ErrorKind, ViewerError};
use crate::fetch::FetchError;
use crate::state::cache::{AlbumCompletion, AlbumRequest, PhotoCompletion, PhotoRequest};
use crate::state::{MetadataCache, PhotoDescriptor, PhotoLookup};
use crate::ui::screen::{AlbumScreen, PhotoScreen, Renderer};

/// Where the state machine stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Start,
    AwaitingAlbum,
    AlbumView,
    AwaitingPhoto(u32),
    PhotoView(u32),
    Error(ErrorKind),
}

/// A fetch the caller must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Album(AlbumRequest),
    Photo(PhotoRequest),
    /// Fire-and-forget download of photo pixels
    Preload(String),
}

/// The outcome of a `Request`, to be fed back through `complete`
#[derive(Debug, Clone)]
pub enum Completion {
    Album {
        request: AlbumRequest,
        result: Result<Value, FetchError>,
    },
    Photo {
        request: PhotoRequest,
        result: Result<Value, FetchError>,
    },
    Preload {
        uri: String,
        result: Result<Vec<u8>, FetchError>,
    },
}

/// Everything the controller knows about the current browsing session
#[derive(Debug)]
pub struct NavigationSession {
    pub cache: MetadataCache,
    /// The most recent successfully parsed target
    pub target: Option<NavigationTarget>,
    pub state: ViewState,
    pub debug: bool,
}

impl NavigationSession {
    fn new() -> Self {
        Self {
            cache: MetadataCache::new(),
            target: None,
            state: ViewState::Start,
            debug: false,
        }
    }
}

#[derive(Debug)]
pub struct NavigationController {
    session: NavigationSession,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationController {
    pub fn new() -> Self {
        Self {
            session: NavigationSession::new(),
        }
    }

    pub fn state(&self) -> ViewState {
        self.session.state
    }

    pub fn session(&self) -> &NavigationSession {
        &self.session
    }

    /// Handle a fragment change (or the initial load)
    pub fn navigate<R: Renderer + ?Sized>(
        &mut self,
        fragment: &str,
        renderer: &mut R,
    ) -> Vec<Request> {
        match fragment::parse(fragment) {
            Ok(target) => self.navigate_to(target, renderer),
            Err(e) => {
                self.session.target = None;
                self.fail(ViewerError::MalformedFragment(e), renderer);
                Vec::new()
            }
        }
    }

    /// Handle a navigation to an already parsed target
    pub fn navigate_to<R: Renderer + ?Sized>(
        &mut self,
        target: NavigationTarget,
        renderer: &mut R,
    ) -> Vec<Request> {
        debug!("Navigate to {}", target.to_fragment());
        let mut requests = Vec::new();
        self.session.state = ViewState::Start;

        if target.debug != self.session.debug {
            self.session.debug = target.debug;
            renderer.set_debug(target.debug);
        }

        let album_id = target.album_id.clone();
        self.session.target = Some(target);

        if !self.session.cache.holds(&album_id) {
            self.session.state = ViewState::AwaitingAlbum;
            if let Some(request) = self.session.cache.load_album(&album_id) {
                info!("📁 Loading album '{}'", album_id);
                requests.push(Request::Album(request));
            }
            return requests;
        }

        if self.session.cache.album().is_none() {
            // Album still in flight; it will pick up the latest page
            self.session.state = ViewState::AwaitingAlbum;
            return requests;
        }

        self.show_current_page(renderer, &mut requests);
        requests
    }

    /// Handle a fetch completion
    pub fn complete<R: Renderer + ?Sized>(
        &mut self,
        completion: Completion,
        renderer: &mut R,
    ) -> Vec<Request> {
        let mut requests = Vec::new();
        match completion {
            Completion::Album { request, result } => {
                self.album_completed(&request, result, renderer, &mut requests)
            }
            Completion::Photo { request, result } => {
                self.photo_completed(&request, result, renderer, &mut requests)
            }
            Completion::Preload { uri, result } => {
                if let Err(e) = result {
                    debug!("Pixel preload of {} failed: {}", uri, e);
                }
            }
        }
        requests
    }

    fn album_completed<R: Renderer + ?Sized>(
        &mut self,
        request: &AlbumRequest,
        result: Result<Value, FetchError>,
        renderer: &mut R,
        requests: &mut Vec<Request>,
    ) {
        match self.session.cache.complete_album(&request.tag, result) {
            AlbumCompletion::Stale => {
                debug!("Discarding stale album response for '{}'", request.tag.album_id);
            }
            AlbumCompletion::Loaded(album) => {
                info!(
                    "✅ Album '{}' loaded: {} photos",
                    request.tag.album_id,
                    album.photo_count()
                );
                if self.live_album_is(&request.tag.album_id) {
                    self.show_current_page(renderer, requests);
                }
            }
            AlbumCompletion::Failed(e) => {
                if self.live_album_is(&request.tag.album_id) {
                    self.fail(ViewerError::AlbumUnavailable(e), renderer);
                } else {
                    warn!("⚠️  Album '{}' failed to load: {}", request.tag.album_id, e);
                }
            }
        }
    }

    fn photo_completed<R: Renderer + ?Sized>(
        &mut self,
        request: &PhotoRequest,
        result: Result<Value, FetchError>,
        renderer: &mut R,
        requests: &mut Vec<Request>,
    ) {
        match self.session.cache.complete_photo(request, result) {
            PhotoCompletion::Stale => {
                debug!(
                    "Discarding stale photo response for '{}' page {}",
                    request.tag.album.album_id, request.tag.page
                );
            }
            PhotoCompletion::Stored { page, photo, preload } => {
                if let Some(uri) = preload {
                    requests.push(Request::Preload(uri));
                }
                if self.session.state == ViewState::AwaitingPhoto(page) {
                    self.show_photo(page, photo, renderer, requests);
                } else {
                    debug!("Cached page {} without rendering", page);
                }
            }
            PhotoCompletion::Failed { page, fatal, error } => {
                let awaited = self.session.state == ViewState::AwaitingPhoto(page);
                match (awaited, fatal) {
                    (true, true) => self.fail(ViewerError::PhotoUnavailable(error), renderer),
                    (true, false) => {
                        // A prefetch failed for the page the user now waits on
                        if let Some(request) = self.session.cache.fetch_photo(page, true) {
                            requests.push(Request::Photo(request));
                        }
                    }
                    (false, true) => {
                        warn!("⚠️  Page {} failed after navigating away: {}", page, error)
                    }
                    // Already logged by the cache
                    (false, false) => {}
                }
            }
        }
    }

    /// Resolve the live target's page against a loaded album
    fn show_current_page<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        requests: &mut Vec<Request>,
    ) {
        let Some((page, is_index)) = self.session.target.as_ref().map(|t| (t.page, t.is_index()))
        else {
            return;
        };
        let Some(count) = self.session.cache.album().map(|a| a.photo_count()) else {
            return;
        };

        if is_index {
            self.show_album(renderer, requests);
        } else if page > count {
            self.fail(ViewerError::OutOfRangePage { page, count }, renderer);
        } else {
            match self.session.cache.get_photo(page) {
                PhotoLookup::Present(photo) => self.show_photo(page, photo, renderer, requests),
                PhotoLookup::InFlight => {
                    self.session.state = ViewState::AwaitingPhoto(page);
                }
                PhotoLookup::Absent => {
                    self.session.state = ViewState::AwaitingPhoto(page);
                    if let Some(request) = self.session.cache.fetch_photo(page, true) {
                        requests.push(Request::Photo(request));
                    }
                }
            }
        }
    }

    fn show_album<R: Renderer + ?Sized>(&mut self, renderer: &mut R, requests: &mut Vec<Request>) {
        let session = &mut self.session;
        let (Some(target), Some(paths), Some(album)) =
            (session.target.as_ref(), session.cache.paths(), session.cache.album())
        else {
            return;
        };

        let screen = AlbumScreen::build(target, paths, album);
        info!("Rendering album '{}'", target.album_id);
        renderer.render_album(&screen);
        session.state = ViewState::AlbumView;

        requests.extend(session.cache.prefetch_after(0).map(Request::Photo));
    }

    fn show_photo<R: Renderer + ?Sized>(
        &mut self,
        page: u32,
        photo: Arc<PhotoDescriptor>,
        renderer: &mut R,
        requests: &mut Vec<Request>,
    ) {
        let session = &mut self.session;
        let (Some(target), Some(paths), Some(album)) =
            (session.target.as_ref(), session.cache.paths(), session.cache.album())
        else {
            return;
        };

        let screen = PhotoScreen::build(target, paths, album, photo, page);
        info!("Rendering '{}' page {}", target.album_id, screen.index_label());
        renderer.render_photo(&screen);
        session.state = ViewState::PhotoView(page);

        requests.extend(session.cache.prefetch_after(page).map(Request::Photo));
    }

    fn fail<R: Renderer + ?Sized>(&mut self, e: ViewerError, renderer: &mut R) {
        error!("❌ {}", e);
        self.session.state = ViewState::Error(e.kind());
        renderer.show_error(&e.to_string());
    }

    fn live_album_is(&self, album_id: &str) -> bool {
        self.session
            .target
            .as_ref()
            .is_some_and(|t| t.album_id == album_id)
    }

    /// Target of the next photo, if there is one. On the index this is page 1.
    pub fn next_target(&self) -> Option<NavigationTarget> {
        let target = self.session.target.as_ref()?;
        let count = self.session.cache.album()?.photo_count();
        match self.session.state {
            ViewState::AlbumView if count > 0 => Some(target.with_page(1)),
            ViewState::PhotoView(page) if page < count => Some(target.with_page(page + 1)),
            _ => None,
        }
    }

    /// Target of the previous photo, if on a photo page other than the first
    pub fn previous_target(&self) -> Option<NavigationTarget> {
        let target = self.session.target.as_ref()?;
        match self.session.state {
            ViewState::PhotoView(page) if page > 1 => Some(target.with_page(page - 1)),
            _ => None,
        }
    }

    /// Target of the album index, if on a photo page
    pub fn index_target(&self) -> Option<NavigationTarget> {
        let target = self.session.target.as_ref()?;
        match self.session.state {
            ViewState::PhotoView(_) | ViewState::AwaitingPhoto(_) => Some(target.with_page(0)),
            _ => None,
        }
    }
}
