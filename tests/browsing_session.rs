use std::cell::RefCell;

use rstest::rstest;
use tabshell_browser_lib::modules::tabs::CloseOutcome;
use tabshell_browser_lib::registers::RegisterKind;
use tabshell_browser_lib::session::BrowserSession;
use tabshell_browser_lib::settings::{SearchEngine, Settings};
use tabshell_browser_lib::surface::RenderingSurface;

/// Stands in for a webview: navigation moves it to the new URL at once.
#[derive(Default)]
struct FakeView {
    url: RefCell<Option<String>>,
    loads: RefCell<Vec<String>>,
}

impl RenderingSurface for FakeView {
    fn navigate(&self, url: &str) {
        self.loads.borrow_mut().push(url.to_string());
        *self.url.borrow_mut() = Some(url.to_string());
    }
    fn back(&self) {}
    fn forward(&self) {}
    fn reload(&self) {}
    fn stop(&self) {}
    fn current_url(&self) -> Option<String> {
        self.url.borrow().clone()
    }
}

/// Drives one tab the way the shell does: navigate, then report the load.
fn visit(session: &mut BrowserSession, label: &str, view: &FakeView, input: &str) {
    session.navigate_to_address(input, view);
    if let Some(url) = view.current_url() {
        session.on_url_changed(label, &url);
        session.on_load_finished(label, &url);
    }
}

#[test]
fn browsing_fills_history_in_visit_order() {
    let mut session = BrowserSession::default();
    let tab = session.new_tab();
    let view = FakeView::default();

    visit(&mut session, &tab.webview_label, &view, "https://www.rust-lang.org");
    visit(&mut session, &tab.webview_label, &view, "rust book");
    visit(&mut session, &tab.webview_label, &view, "https://www.rust-lang.org");

    assert_eq!(
        view.loads.borrow().as_slice(),
        [
            "https://www.rust-lang.org",
            "https://www.google.com/search?q=rust book",
            "https://www.rust-lang.org",
        ]
    );
    assert_eq!(session.history.list(), vec!["Rust-lang", "Google"]);
}

#[test]
fn same_name_entries_are_reachable_by_index() {
    let mut session = BrowserSession::default();
    let view = FakeView::default();

    session.add_bookmark("https://example.com/first");
    session.add_bookmark("https://example.net/second");
    assert_eq!(session.bookmarks.list(), vec!["Example", "Example"]);

    // The name lookup can only ever reach the first one
    session.bookmarks.navigate_to("Example", &view);
    session.open_register_entry(RegisterKind::Bookmarks, 1, &view);

    assert_eq!(
        view.loads.borrow().as_slice(),
        ["https://example.com/first", "https://example.net/second"]
    );
}

#[test]
fn closing_tabs_down_to_the_last_one_closes_the_window() {
    let mut session = BrowserSession::default();
    session.new_tab();
    session.new_tab();

    assert!(matches!(session.close_tab(0), CloseOutcome::Closed(_)));
    assert_eq!(session.close_tab(0), CloseOutcome::LastTab);
    assert_eq!(session.tabs.len(), 1);
}

#[rstest]
#[case(SearchEngine::Google, "https://www.google.com/search?q=openai.com")]
#[case(SearchEngine::Bing, "https://www.bing.com/search?q=openai.com")]
#[case(SearchEngine::Brave, "https://search.brave.com/search?q=openai.com")]
#[case(SearchEngine::DuckDuckGo, "https://duckduckgo.com/?q=openai.com")]
#[case(SearchEngine::Wikipedia, "https://wikipedia.org/wiki/openai.com")]
fn saved_engine_survives_restart(#[case] engine: SearchEngine, #[case] expected: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path = Settings::get_path(dir.path());

    let mut first = BrowserSession::new(Settings::load(&path));
    first.set_search_engine(engine);
    first.settings.save(&path).unwrap();

    let second = BrowserSession::new(Settings::load(&path));
    let view = FakeView::default();
    second.navigate_to_address("openai.com", &view);

    assert_eq!(view.current_url().as_deref(), Some(expected));
}
