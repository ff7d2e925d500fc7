/// Retained renderer for the desktop shell
///
/// Keeps the last painted screen and error for the iced view, and the image
/// URIs that screen still needs loaded.

use std::collections::VecDeque;

use tracing::debug;

use super::screen::{AlbumScreen, PhotoScreen, Renderer};

/// What the window currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Painted {
    #[default]
    Blank,
    Album(AlbumScreen),
    Photo(PhotoScreen),
}

/// `Renderer` that paints into state the iced view reads back
#[derive(Debug, Default)]
pub struct Canvas {
    /// Last screen painted
    pub painted: Painted,
    /// Fatal error shown above the page, if any
    pub error: Option<String>,
    pub debug: bool,
    /// Image URIs the shell still has to load
    pixel_requests: VecDeque<String>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the image URIs requested since the last call
    pub fn take_pixel_requests(&mut self) -> Vec<String> {
        self.pixel_requests.drain(..).collect()
    }

    /// Link back to the painted page without debug mode, shown while it is on
    pub fn leave_debug_link(&self) -> Option<&str> {
        if !self.debug {
            return None;
        }
        match &self.painted {
            Painted::Blank => None,
            Painted::Album(screen) => Some(screen.leave_debug_link.as_str()),
            Painted::Photo(screen) => Some(screen.leave_debug_link.as_str()),
        }
    }

    /// Title for the window
    pub fn title(&self) -> String {
        match &self.painted {
            Painted::Blank => "Album viewer".to_string(),
            Painted::Album(screen) => screen.title.clone(),
            Painted::Photo(screen) => screen.window_title(),
        }
    }

    fn request_pixels(&mut self, uri: &str) {
        if !self.pixel_requests.iter().any(|queued| queued == uri) {
            self.pixel_requests.push_back(uri.to_string());
        }
    }
}

impl Renderer for Canvas {
    fn render_album(&mut self, screen: &AlbumScreen) {
        debug!("Painting album index with {} thumbnails", screen.thumbnails.len());
        self.error = None;
        for thumbnail in &screen.thumbnails {
            self.request_pixels(&thumbnail.uri);
        }
        self.painted = Painted::Album(screen.clone());
    }

    fn render_photo(&mut self, screen: &PhotoScreen) {
        debug!("Painting photo page {}", screen.index_label());
        self.error = None;
        self.request_pixels(&screen.photo_uri);
        for neighbour in [&screen.previous, &screen.next].into_iter().flatten() {
            self.request_pixels(&neighbour.uri);
        }
        self.painted = Painted::Photo(screen.clone());
    }

    fn show_error(&mut self, message: &str) {
        debug!("Showing error: {}", message);
        self.error = Some(message.to_string());
    }

    fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }
}
