// Shared state structs, kept apart from the Tauri wiring so they can be
// tested independently.

use std::path::PathBuf;
use std::sync::Mutex;
use serde::{Deserialize, Serialize};

use crate::session::BrowserSession;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub webview_label: String,
    pub title: String,
    pub url: String,
    pub is_loading: bool,
}

/// Payload of the `update-tabs` event and the `get_tabs` command.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TabsPayload {
    pub tabs: Vec<Tab>,
    pub active_tab_id: Option<String>,
}

/// Chrome updates after a page finished loading.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TitleUpdate {
    pub window_title: String,
    pub tab_title: String,
    pub address_text: String,
}

pub struct AppState {
    pub session: Mutex<BrowserSession>,
    pub settings_path: PathBuf,
}

impl AppState {
    pub fn new(session: BrowserSession, settings_path: PathBuf) -> Self {
        Self {
            session: Mutex::new(session),
            settings_path,
        }
    }
}
