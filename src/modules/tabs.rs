// Tab strip bookkeeping - pure logic, no Tauri imports.
// The desktop shell owns one webview per entry and mirrors these operations.

use crate::modules::navigation::display_name;
use crate::state::{Tab, TabsPayload};

/// Result of asking to close a tab.
#[derive(Debug, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The tab was removed; its webview should be destroyed.
    Closed(Tab),
    /// It was the only tab; the whole window should close instead.
    LastTab,
    OutOfRange,
}

#[derive(Debug, Default)]
pub struct TabStrip {
    tabs: Vec<Tab>,
    active_tab_id: Option<String>,
    next_id: u64,
}

impl TabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tab showing `url` and makes it the active one.
    pub fn open(&mut self, url: &str) -> Tab {
        self.next_id += 1;
        let tab = Tab {
            id: format!("tab-{}", self.next_id),
            webview_label: format!("content-{}", self.next_id),
            title: display_name(url),
            url: url.to_string(),
            is_loading: true,
        };
        log::debug!("[Tabs] Opened {} at {}", tab.id, url);
        self.tabs.push(tab.clone());
        self.active_tab_id = Some(tab.id.clone());
        tab
    }

    /// Removes the tab at `index` unless it is the last one left.
    ///
    /// When the active tab goes away, the tab that slides into its slot
    /// (or the new last tab) becomes active.
    pub fn close(&mut self, index: usize) -> CloseOutcome {
        if index >= self.tabs.len() {
            return CloseOutcome::OutOfRange;
        }
        if self.tabs.len() == 1 {
            return CloseOutcome::LastTab;
        }

        let removed = self.tabs.remove(index);
        if self.active_tab_id.as_deref() == Some(removed.id.as_str()) {
            let next = index.min(self.tabs.len() - 1);
            self.active_tab_id = Some(self.tabs[next].id.clone());
        }
        log::debug!("[Tabs] Closed {} ({} left)", removed.id, self.tabs.len());
        CloseOutcome::Closed(removed)
    }

    pub fn select(&mut self, index: usize) -> Option<&Tab> {
        let tab = self.tabs.get(index)?;
        self.active_tab_id = Some(tab.id.clone());
        Some(tab)
    }

    pub fn active(&self) -> Option<&Tab> {
        let id = self.active_tab_id.as_deref()?;
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn active_index(&self) -> Option<usize> {
        let id = self.active_tab_id.as_deref()?;
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn position(&self, webview_label: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.webview_label == webview_label)
    }

    pub fn get_by_label_mut(&mut self, webview_label: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.webview_label == webview_label)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn payload(&self) -> TabsPayload {
        TabsPayload {
            tabs: self.tabs.clone(),
            active_tab_id: self.active_tab_id.clone(),
        }
    }
}
