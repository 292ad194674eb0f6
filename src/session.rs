// The single owned session state and the handlers the shell calls into.
// Every handler is synchronous and runs to completion on the caller's thread.

use crate::modules::navigation::{display_name, host_of, resolve_address_input};
use crate::modules::tabs::{CloseOutcome, TabStrip};
use crate::registers::{RegisterKind, SessionRegister};
use crate::settings::{SearchEngine, Settings, HOME_PAGE, YOUTUBE_URL};
use crate::state::{Tab, TitleUpdate};
use crate::surface::RenderingSurface;

pub const APP_NAME: &str = "Tabshell";

/// Main window title for a tab showing `url`: its host, or "New Tab".
pub fn window_title(url: &str) -> String {
    let host = host_of(url).unwrap_or_else(|| "New Tab".to_string());
    format!("{} - {}", host, APP_NAME)
}

#[derive(Debug, Default)]
pub struct BrowserSession {
    pub history: SessionRegister,
    pub bookmarks: SessionRegister,
    pub settings: Settings,
    pub tabs: TabStrip,
}

impl BrowserSession {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn register(&self, kind: RegisterKind) -> &SessionRegister {
        match kind {
            RegisterKind::History => &self.history,
            RegisterKind::Bookmarks => &self.bookmarks,
        }
    }

    pub fn register_mut(&mut self, kind: RegisterKind) -> &mut SessionRegister {
        match kind {
            RegisterKind::History => &mut self.history,
            RegisterKind::Bookmarks => &mut self.bookmarks,
        }
    }

    /// Handles Return in the address bar. Issues at most one navigation.
    pub fn navigate_to_address<S: RenderingSurface + ?Sized>(
        &self,
        input: &str,
        surface: &S,
    ) -> Option<String> {
        let target = resolve_address_input(input, self.settings.search_engine)?;
        log::info!("[Navigation] {:?} -> {}", input.trim(), target);
        surface.navigate(&target);
        Some(target)
    }

    pub fn go_home<S: RenderingSurface + ?Sized>(&self, surface: &S) {
        surface.navigate(HOME_PAGE);
    }

    pub fn open_youtube<S: RenderingSurface + ?Sized>(&self, surface: &S) {
        surface.navigate(YOUTUBE_URL);
    }

    /// Opens a tab at the home page. The address bar is cleared until the
    /// new surface reports its first URL.
    pub fn new_tab(&mut self) -> Tab {
        self.tabs.open(HOME_PAGE)
    }

    pub fn close_tab(&mut self, index: usize) -> CloseOutcome {
        self.tabs.close(index)
    }

    /// A surface changed URL. Returns the text for the address bar.
    pub fn on_url_changed(&mut self, webview_label: &str, url: &str) -> String {
        if let Some(tab) = self.tabs.get_by_label_mut(webview_label) {
            tab.url = url.to_string();
            tab.is_loading = true;
        }
        url.to_string()
    }

    /// A surface finished loading `url`: record it in history and relabel
    /// the tab. `url` is the final one, after any redirects, so it also
    /// replaces the address bar text when the tab is active.
    pub fn on_load_finished(&mut self, webview_label: &str, url: &str) -> TitleUpdate {
        if self.history.record(url) {
            log::debug!("[History] Recorded {}", url);
        }

        let tab_title = display_name(url);
        if let Some(tab) = self.tabs.get_by_label_mut(webview_label) {
            tab.url = url.to_string();
            tab.title = tab_title.clone();
            tab.is_loading = false;
        }

        TitleUpdate {
            window_title: window_title(url),
            tab_title,
            address_text: url.to_string(),
        }
    }

    pub fn add_bookmark(&mut self, url: &str) -> bool {
        let added = self.bookmarks.record(url);
        if added {
            log::info!("[Bookmarks] Added {}", url);
        }
        added
    }

    pub fn open_register_entry<S: RenderingSurface + ?Sized>(
        &self,
        kind: RegisterKind,
        index: usize,
        surface: &S,
    ) -> bool {
        self.register(kind).navigate_to_index(index, surface)
    }

    pub fn clear_register(&mut self, kind: RegisterKind) {
        self.register_mut(kind).clear();
        log::info!("[{}] Cleared", kind.title());
    }

    pub fn set_search_engine(&mut self, engine: SearchEngine) {
        self.settings.search_engine = engine;
    }

    /// History only lives as long as the window.
    pub fn on_window_closed(&mut self) {
        self.history.clear();
    }
}
