/// Navigation
///
/// - Fragment parsing and generation (fragment.rs)
/// - The navigation state machine (controller.rs)

pub mod controller;
pub mod fragment;

pub use controller::{Completion, NavigationController, NavigationSession, Request, ViewState};
pub use fragment::{parse as parse_fragment, FragmentError, NavigationTarget};
