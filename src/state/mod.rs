/// Session state
///
/// This module holds what the viewer knows about the album being browsed:
/// - Album and photo descriptors with their validation (data.rs)
/// - Resource locations relative to the album directory (paths.rs)
/// - The single-flight metadata cache (cache.rs)

pub mod cache;
pub mod data;
pub mod paths;

pub use cache::{MetadataCache, PhotoLookup};
pub use data::{AlbumDescriptor, DescriptorError, Orientation, PhotoDescriptor, PhotoSummary};
pub use paths::AlbumPaths;
