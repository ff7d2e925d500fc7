//! Album viewer core
//!
//! A photo album is a tree of static JSON descriptors: one album descriptor
//! listing the photos, and one photo descriptor per page. The URL fragment
//! (`#/album/3`) is the only navigation input. This crate holds the pieces
//! that turn a fragment into painted screens:
//!
//! - `nav` parses fragments and runs the navigation state machine
//! - `state` owns the descriptors and the per-album metadata cache
//! - `fetch` retrieves descriptors and pixels from a directory or web server
//! - `ui` defines the renderer interface, the image-fit layout and history
//!
//! The desktop shell in `main.rs` wires these to an iced window.

pub mod config;
pub mod error;
pub mod fetch;
pub mod nav;
pub mod state;
pub mod ui;

pub use error::{ErrorKind, ViewerError};
pub use nav::{
    parse_fragment, Completion, NavigationController, NavigationTarget, Request, ViewState,
};
