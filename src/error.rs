/// Error taxonomy
///
/// Fatal kinds halt navigation in `ViewState::Error` and are shown to the
/// user. Prefetch failures are logged where they happen and never reach
/// this type. Stale responses are not errors at all.

use thiserror::Error;

use crate::fetch::FetchError;
use crate::nav::fragment::FragmentError;
use crate::state::data::DescriptorError;

/// Loading a descriptor failed: either transport or validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// A fatal, user-visible navigation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewerError {
    #[error("Incorrect page arguments: {0}")]
    MalformedFragment(#[from] FragmentError),

    #[error("Album data is unavailable: {0}")]
    AlbumUnavailable(ResourceError),

    #[error("Photo data is unavailable: {0}")]
    PhotoUnavailable(ResourceError),

    #[error("Photo number {page} out of range (album has {count} photos)")]
    OutOfRangePage { page: u32, count: u32 },
}

/// Discriminant of `ViewerError`, carried by the error state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedFragment,
    AlbumUnavailable,
    PhotoUnavailable,
    OutOfRangePage,
}

impl ViewerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ViewerError::MalformedFragment(_) => ErrorKind::MalformedFragment,
            ViewerError::AlbumUnavailable(_) => ErrorKind::AlbumUnavailable,
            ViewerError::PhotoUnavailable(_) => ErrorKind::PhotoUnavailable,
            ViewerError::OutOfRangePage { .. } => ErrorKind::OutOfRangePage,
        }
    }
}
