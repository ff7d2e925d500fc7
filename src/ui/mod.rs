/// Presentation side of the viewer
///
/// - `screen.rs` - the `Renderer` trait and the screens it paints
/// - `canvas.rs` - retained renderer used by the desktop shell
/// - `layout.rs` - photo fitting
/// - `history.rs` - back/forward over fragments
/// - `keys.rs` - keyboard navigation
/// - `pixels.rs` - decoded images of the current album

pub mod canvas;
pub mod history;
pub mod keys;
pub mod layout;
pub mod pixels;
pub mod screen;

pub use canvas::{Canvas, Painted};
pub use history::History;
pub use keys::{command_for, KeyCommand, NavKey};
pub use layout::{fit, Constraint, Dimensions, LayoutResult, PhotoFitter, PhotoSurface};
pub use pixels::PixelStore;
pub use screen::{AlbumScreen, PhotoScreen, Renderer, ThumbnailLink};
