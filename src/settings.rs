use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Page opened by new tabs and the Home button.
pub const HOME_PAGE: &str = "http://www.google.com";

/// Target of the YouTube shortcut button.
pub const YOUTUBE_URL: &str = "https://www.youtube.com";

/// File name of the search engine setting inside the app data dir.
pub const SETTINGS_FILE: &str = "settings.txt";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unrecognized search engine prefix: {0:?}")]
    Unrecognized(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SearchEngine {
    #[default]
    Google,
    Bing,
    Brave,
    DuckDuckGo,
    Wikipedia,
}

impl SearchEngine {
    /// Display order of the settings dialog.
    pub const ALL: [SearchEngine; 5] = [
        Self::Google,
        Self::Bing,
        Self::Brave,
        Self::DuckDuckGo,
        Self::Wikipedia,
    ];

    /// The URL prefix a query is appended to.
    ///
    /// Wikipedia is a path prefix rather than a query parameter, so a query
    /// there lands directly on the article of that name.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Google => "https://www.google.com/search?q=",
            Self::Bing => "https://www.bing.com/search?q=",
            Self::Brave => "https://search.brave.com/search?q=",
            Self::DuckDuckGo => "https://duckduckgo.com/?q=",
            Self::Wikipedia => "https://wikipedia.org/wiki/",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Bing => "Bing",
            Self::Brave => "Brave",
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Wikipedia => "Wikipedia",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.prefix() == prefix)
    }

    /// Concatenates the prefix with the raw query. No percent-encoding is
    /// applied; the rendering engine tolerates the result.
    pub fn query_url(&self, query: &str) -> String {
        format!("{}{}", self.prefix(), query)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    pub search_engine: SearchEngine,
}

impl Settings {
    pub fn get_path(app_data_dir: &Path) -> PathBuf {
        app_data_dir.join(SETTINGS_FILE)
    }

    /// Parses the one-line settings format: exactly the engine's prefix.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let line = content.trim();
        SearchEngine::from_prefix(line)
            .map(|search_engine| Self { search_engine })
            .ok_or_else(|| SettingsError::Unrecognized(line.to_string()))
    }

    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                log::warn!("[Settings] Failed to parse settings: {}, returning defaults", e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("[Settings] Failed to read file: {}, returning defaults", e);
                Self::default()
            }
        }
    }

    /// Overwrites the settings file with the selected prefix.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let tmp_path = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to tmp, then rename, so a crash never leaves a half-written file.
        fs::write(&tmp_path, self.search_engine.prefix())?;
        fs::rename(tmp_path, path)?;

        log::info!(
            "[Settings] Saved search engine {} to {:?}",
            self.search_engine.label(),
            path
        );
        Ok(())
    }
}
