/// Renderer interface and the screens it paints
///
/// The navigation controller decides *what* is shown and hands a fully
/// resolved screen to a `Renderer`; the renderer only paints. Links inside
/// a screen are fragments, ready to be fed back as navigation events.

use std::sync::Arc;

use super::layout::Dimensions;
use crate::nav::NavigationTarget;
use crate::state::{AlbumDescriptor, AlbumPaths, Orientation, PhotoDescriptor};

/// Long side of a thumbnail frame
pub const THUMBNAIL_LONG_SIDE: f32 = 160.0;
/// Short side of a thumbnail frame
pub const THUMBNAIL_SHORT_SIDE: f32 = 120.0;

/// Paints resolved screens. Implemented by the desktop shell and by tests.
pub trait Renderer {
    /// Show the album index
    fn render_album(&mut self, screen: &AlbumScreen);

    /// Show one photo page
    fn render_photo(&mut self, screen: &PhotoScreen);

    /// Surface a fatal error to the user
    fn show_error(&mut self, message: &str);

    /// Debug mode was switched on or off
    fn set_debug(&mut self, _enabled: bool) {}
}

/// A thumbnail that links to a photo page
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailLink {
    pub page: u32,
    /// Thumbnail image URI (album-relative, resolved against the album directory)
    pub uri: String,
    pub orientation: Orientation,
    /// Fragment of the photo page
    pub link: String,
}

impl ThumbnailLink {
    /// Frame the thumbnail is drawn in, portrait or landscape
    pub fn frame(&self) -> Dimensions {
        match self.orientation {
            Orientation::Vertical => Dimensions::new(THUMBNAIL_SHORT_SIDE, THUMBNAIL_LONG_SIDE),
            Orientation::Horizontal => Dimensions::new(THUMBNAIL_LONG_SIDE, THUMBNAIL_SHORT_SIDE),
        }
    }
}

/// Everything needed to paint the album index
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumScreen {
    pub title: String,
    pub footer: String,
    pub description: String,
    pub thumbnails: Vec<ThumbnailLink>,
    pub debug: bool,
    /// This page with debug mode off
    pub leave_debug_link: String,
}

/// Everything needed to paint a photo page
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoScreen {
    pub album_title: String,
    pub footer: String,
    pub photo: Arc<PhotoDescriptor>,
    /// Full-size image URI
    pub photo_uri: String,
    pub page: u32,
    pub total: u32,
    pub previous: Option<ThumbnailLink>,
    pub next: Option<ThumbnailLink>,
    /// Fragment of the album index
    pub index_link: String,
    pub debug: bool,
    /// This page with debug mode off
    pub leave_debug_link: String,
}

fn thumbnail_link(
    target: &NavigationTarget,
    paths: &AlbumPaths,
    album: &AlbumDescriptor,
    page: u32,
) -> Option<ThumbnailLink> {
    let summary = album.summary(page)?;
    Some(ThumbnailLink {
        page,
        uri: paths.resource(&summary.thumbnail_path),
        orientation: summary.orientation,
        link: target.with_page(page).to_fragment(),
    })
}

impl AlbumScreen {
    pub fn build(target: &NavigationTarget, paths: &AlbumPaths, album: &AlbumDescriptor) -> Self {
        let thumbnails = (1..=album.photo_count())
            .filter_map(|page| thumbnail_link(target, paths, album, page))
            .collect();

        Self {
            title: album.title.clone(),
            footer: album.footer.clone(),
            description: album.description.clone(),
            thumbnails,
            debug: target.debug,
            leave_debug_link: target.with_page(0).without_debug().to_fragment(),
        }
    }
}

impl PhotoScreen {
    pub fn build(
        target: &NavigationTarget,
        paths: &AlbumPaths,
        album: &AlbumDescriptor,
        photo: Arc<PhotoDescriptor>,
        page: u32,
    ) -> Self {
        let previous = page
            .checked_sub(1)
            .filter(|p| *p >= 1)
            .and_then(|p| thumbnail_link(target, paths, album, p));
        let next = thumbnail_link(target, paths, album, page + 1);

        Self {
            album_title: album.title.clone(),
            footer: album.footer.clone(),
            photo_uri: paths.resource(&photo.photo_path),
            photo,
            page,
            total: album.photo_count(),
            previous,
            next,
            index_link: target.with_page(0).to_fragment(),
            debug: target.debug,
            leave_debug_link: target.with_page(page).without_debug().to_fragment(),
        }
    }

    /// Position label, e.g. "2/3"
    pub fn index_label(&self) -> String {
        format!("{}/{}", self.page, self.total)
    }

    /// Window title, e.g. "Trip (2/3)"
    pub fn window_title(&self) -> String {
        format!("{} ({})", self.album_title, self.index_label())
    }
}
