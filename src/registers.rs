use serde::{Deserialize, Serialize};

use crate::modules::navigation::display_name;
use crate::surface::RenderingSurface;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegisterEntry {
    pub display_name: String,
    pub url: String,
}

impl RegisterEntry {
    pub fn new(url: &str) -> Self {
        Self {
            display_name: display_name(url),
            url: url.to_string(),
        }
    }
}

/// Which register a dialog or command refers to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegisterKind {
    History,
    Bookmarks,
}

impl RegisterKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::History => "History",
            Self::Bookmarks => "Bookmarks",
        }
    }

    /// Window label of the list dialog, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::History => "history",
            Self::Bookmarks => "bookmarks",
        }
    }
}

/// An in-memory, insertion-ordered list of pages, unique by exact URL string.
///
/// Used for both session history and bookmarks. Nothing here is persisted.
#[derive(Debug, Default, Clone)]
pub struct SessionRegister {
    entries: Vec<RegisterEntry>,
}

impl SessionRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `url` unless it is empty or already present.
    ///
    /// URLs are compared verbatim: `http://x.com` and `http://x.com/` are
    /// different entries.
    pub fn record(&mut self, url: &str) -> bool {
        if url.is_empty() || self.contains(url) {
            return false;
        }
        self.entries.push(RegisterEntry::new(url));
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|e| e.url == url)
    }

    /// Display names in insertion order, as shown in the list dialogs.
    pub fn list(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.display_name.clone()).collect()
    }

    pub fn entries(&self) -> &[RegisterEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&RegisterEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Navigates to the first entry named `name`.
    ///
    /// Display names are not unique, so two hosts with the same label resolve
    /// to whichever was recorded first. Prefer [`Self::navigate_to_index`].
    pub fn navigate_to<S: RenderingSurface + ?Sized>(&self, name: &str, surface: &S) -> bool {
        match self.entries.iter().find(|e| e.display_name == name) {
            Some(entry) => {
                surface.navigate(&entry.url);
                true
            }
            None => false,
        }
    }

    /// Navigates to the entry at `index`; out-of-range is a no-op.
    pub fn navigate_to_index<S: RenderingSurface + ?Sized>(&self, index: usize, surface: &S) -> bool {
        match self.entries.get(index) {
            Some(entry) => {
                surface.navigate(&entry.url);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DeferredSurface;
    use rstest::rstest;

    fn register_with(urls: &[&str]) -> SessionRegister {
        let mut register = SessionRegister::new();
        for url in urls {
            register.record(url);
        }
        register
    }

    #[test]
    fn test_record_appends_new_url_verbatim() {
        let mut register = register_with(&["https://a.com"]);
        assert!(register.record("http://www.example.com/x?y=1"));

        assert_eq!(register.len(), 2);
        assert_eq!(
            register.entries()[1],
            RegisterEntry {
                display_name: "Example".to_string(),
                url: "http://www.example.com/x?y=1".to_string(),
            }
        );
    }

    #[test]
    fn test_record_is_idempotent() {
        let mut register = register_with(&["https://a.com", "https://b.com"]);
        let before = register.entries().to_vec();

        assert!(!register.record("https://a.com"));
        assert_eq!(register.entries(), before.as_slice());
    }

    #[test]
    fn test_record_ignores_empty_url() {
        let mut register = SessionRegister::new();
        assert!(!register.record(""));
        assert!(register.is_empty());
    }

    #[rstest]
    #[case("http://x.com", "http://x.com/")]
    #[case("https://x.com", "http://x.com")]
    #[case("https://x.com/a", "https://x.com/A")]
    fn test_urls_are_not_normalized(#[case] first: &str, #[case] second: &str) {
        let register = register_with(&[first, second]);
        assert_eq!(register.len(), 2);
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let register = register_with(&[
            "https://www.rust-lang.org",
            "https://docs.rs/serde",
            "https://crates.io",
        ]);
        assert_eq!(register.list(), vec!["Rust-lang", "Docs", "Crates"]);
    }

    #[test]
    fn test_clear_then_list_is_empty() {
        let mut register = register_with(&["https://a.com", "https://b.com"]);
        register.clear();
        assert!(register.list().is_empty());
        assert!(register.is_empty());
    }

    #[test]
    fn test_navigate_to_first_matching_name() {
        let register = register_with(&["https://example.com/one", "https://example.org/two"]);
        let surface = DeferredSurface::default();

        assert!(register.navigate_to("Example", &surface));
        assert_eq!(surface.navigations(), vec!["https://example.com/one"]);
    }

    #[test]
    fn test_navigate_to_unknown_name_is_silent() {
        let register = register_with(&["https://example.com"]);
        let surface = DeferredSurface::default();

        assert!(!register.navigate_to("Nothing", &surface));
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_navigate_to_index_reaches_shadowed_entry() {
        let register = register_with(&["https://example.com/one", "https://example.org/two"]);
        let surface = DeferredSurface::default();

        assert!(register.navigate_to_index(1, &surface));
        assert!(!register.navigate_to_index(2, &surface));
        assert_eq!(surface.navigations(), vec!["https://example.org/two"]);
    }
}
