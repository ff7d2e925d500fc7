/// Keyboard navigation
///
/// Maps the navigation keys to what they do on the current page. The shell
/// translates raw key events into `NavKey`; the outcome depends on the view
/// state and on whether the full-screen overlay is open.

use crate::nav::{NavigationController, NavigationTarget, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    /// Page Down or Space
    Next,
    /// Page Up or Backspace
    Previous,
    Home,
    Escape,
    Enter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCommand {
    Navigate(NavigationTarget),
    /// Open the overlay, or close it if open
    ToggleOverlay,
    CloseOverlay,
}

/// What a key press does, or `None` when it does nothing here
pub fn command_for(
    key: NavKey,
    controller: &NavigationController,
    overlay_open: bool,
) -> Option<KeyCommand> {
    match controller.state() {
        ViewState::PhotoView(_) => match key {
            NavKey::Escape if overlay_open => Some(KeyCommand::CloseOverlay),
            NavKey::Enter => Some(KeyCommand::ToggleOverlay),
            NavKey::Next => controller.next_target().map(KeyCommand::Navigate),
            NavKey::Previous => controller.previous_target().map(KeyCommand::Navigate),
            NavKey::Home | NavKey::Escape => controller.index_target().map(KeyCommand::Navigate),
        },
        ViewState::AwaitingPhoto(_) => match key {
            NavKey::Home | NavKey::Escape => controller.index_target().map(KeyCommand::Navigate),
            _ => None,
        },
        ViewState::AlbumView => match key {
            NavKey::Enter => controller.next_target().map(KeyCommand::Navigate),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{Completion, Request};
    use crate::ui::screen::{AlbumScreen, PhotoScreen, Renderer};
    use serde_json::json;

    struct Blank;

    impl Renderer for Blank {
        fn render_album(&mut self, _screen: &AlbumScreen) {}
        fn render_photo(&mut self, _screen: &PhotoScreen) {}
        fn show_error(&mut self, _message: &str) {}
    }

    /// Answer every request until the controller is idle
    fn settle(controller: &mut NavigationController, mut requests: Vec<Request>) {
        while let Some(request) = requests.pop() {
            let completion = match request {
                Request::Album(request) => {
                    let photos: Vec<_> = (1..=3)
                        .map(|i| {
                            json!({"name": format!("p{}", i), "thumbnail": "t.jpg",
                                   "orientation": "horizontal"})
                        })
                        .collect();
                    let album = json!({"title": "Trip", "footer": "", "description": "",
                                       "metadataDir": "m/", "photos": photos});
                    Completion::Album { request, result: Ok(album) }
                }
                Request::Photo(request) => {
                    let photo = json!({"photo": "p.jpg", "width": 800, "height": 600,
                                       "properties": [], "caption": []});
                    Completion::Photo { request, result: Ok(photo) }
                }
                Request::Preload(_) => continue,
            };
            requests.extend(controller.complete(completion, &mut Blank));
        }
    }

    fn at(fragment: &str) -> NavigationController {
        let mut controller = NavigationController::new();
        let requests = controller.navigate(fragment, &mut Blank);
        settle(&mut controller, requests);
        controller
    }

    fn target(page: u32) -> Option<KeyCommand> {
        Some(KeyCommand::Navigate(NavigationTarget::new("trip", page)))
    }

    #[test]
    fn test_escape_closes_overlay_before_leaving_photo() {
        let controller = at("#/trip/2");
        assert_eq!(controller.state(), ViewState::PhotoView(2));

        assert_eq!(
            command_for(NavKey::Escape, &controller, true),
            Some(KeyCommand::CloseOverlay)
        );
        assert_eq!(command_for(NavKey::Escape, &controller, false), target(0));
        assert_eq!(command_for(NavKey::Home, &controller, true), target(0));
    }

    #[test]
    fn test_enter_toggles_overlay_on_photo_page() {
        let controller = at("#/trip/2");
        for overlay_open in [false, true] {
            assert_eq!(
                command_for(NavKey::Enter, &controller, overlay_open),
                Some(KeyCommand::ToggleOverlay)
            );
        }
    }

    #[test]
    fn test_paging_stops_at_album_ends() {
        let first = at("#/trip/1");
        assert_eq!(command_for(NavKey::Previous, &first, false), None);
        assert_eq!(command_for(NavKey::Next, &first, false), target(2));

        let last = at("#/trip/3");
        assert_eq!(command_for(NavKey::Next, &last, false), None);
        assert_eq!(command_for(NavKey::Previous, &last, false), target(2));
    }

    #[test]
    fn test_enter_on_index_opens_first_photo() {
        let controller = at("#/trip");
        assert_eq!(controller.state(), ViewState::AlbumView);
        assert_eq!(command_for(NavKey::Enter, &controller, false), target(1));
        assert_eq!(command_for(NavKey::Escape, &controller, false), None);
        assert_eq!(command_for(NavKey::Next, &controller, false), None);
    }
}
