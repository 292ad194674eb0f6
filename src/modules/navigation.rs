// Pure navigation logic - no Tauri imports allowed.
// This module decides what the address bar input means and how URLs are labelled.

use url::quirks::domain_to_unicode;
use url::Url;
use crate::settings::SearchEngine;

/// Interprets address bar input as either a URL or a search query.
///
/// Returns `None` for blank input. Anything the URL parser accepts with a
/// scheme is returned verbatim (trimmed), whatever the scheme. Everything
/// else becomes a search: the engine prefix followed by the raw text.
///
/// This is purely local string handling. No DNS lookup, prefetch or
/// suggestion request happens before the surface is told to navigate.
pub fn resolve_address_input(input: &str, engine: SearchEngine) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Url::parse(trimmed) {
        Ok(u) if !u.scheme().is_empty() => Some(trimmed.to_string()),
        _ => Some(engine.query_url(trimmed)),
    }
}

/// Short label for a URL, used for tab titles and register entries.
///
/// `http://www.example.com/path` becomes `Example`, and internationalized
/// hosts are shown in Unicode (`http://bücher.de` is `Bücher`). Unparseable URLs and
/// URLs without a host give an empty string.
pub fn display_name(url: &str) -> String {
    // The parser stores IDN hosts as punycode; labels show them as typed.
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(domain_to_unicode))
        .unwrap_or_default();

    let name = host.strip_prefix("www.").unwrap_or(&host);
    let name = name.split('.').next().unwrap_or_default();
    capitalize(name)
}

/// Host of a URL for the window title, if it has one.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .filter(|h| !h.is_empty())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
