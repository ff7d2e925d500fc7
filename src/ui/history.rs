/// Back/forward history of visited fragments
///
/// Bookmarks and back/forward work purely on fragments: going back simply
/// re-navigates to the previous fragment, and the metadata cache makes that
/// free for pages already seen.

#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<String>,
    /// Index of the current entry; meaningless while `entries` is empty
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new visit, dropping any forward entries.
    /// Visiting the current fragment again is not a new entry.
    pub fn visit(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if self.current() == Some(fragment.as_str()) {
            return;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(fragment);
        self.cursor = self.entries.len() - 1;
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back and return the fragment to navigate to
    pub fn back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Step forward and return the fragment to navigate to
    pub fn forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_and_forward() {
        let mut history = History::new();
        assert!(history.back().is_none());

        history.visit("#/trip");
        history.visit("#/trip/1");
        history.visit("#/trip/2");

        assert_eq!(history.back(), Some("#/trip/1"));
        assert_eq!(history.back(), Some("#/trip"));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some("#/trip/1"));
        assert_eq!(history.current(), Some("#/trip/1"));
    }

    #[test]
    fn test_visit_truncates_forward_entries() {
        let mut history = History::new();
        history.visit("#/trip");
        history.visit("#/trip/1");
        history.back();
        history.visit("#/other");

        assert!(!history.can_go_forward());
        assert_eq!(history.back(), Some("#/trip"));
    }

    #[test]
    fn test_repeat_visit_is_ignored() {
        let mut history = History::new();
        history.visit("#/trip/1");
        history.visit("#/trip/1");
        assert!(!history.can_go_back());
    }
}
