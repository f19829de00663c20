//! Shared Selectors

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

/// Runs of whitespace, collapsed by `normalize_space`.
pub static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Attributes that carry a stable per-result identity, in order of trust.
pub const KEY_ATTRIBUTES: &[&str] = &[
    "componentkey",
    "data-urn",
    "data-chameleon-result-urn",
    "data-id",
    "id",
];

/// Compiled profile selectors by source text. Misses are cached as `None`.
static COMPILED: Lazy<Mutex<HashMap<String, Option<Selector>>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Parse a profile-supplied selector, once per distinct string. Malformed
/// input is a soft miss.
pub fn compile(css: &str) -> Option<Selector> {
    let mut cache = COMPILED.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(hit) = cache.get(css) {
        return hit.clone();
    }
    let parsed = match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::debug!(selector = css, error = ?e, "ignoring malformed selector");
            None
        }
    };
    cache.insert(css.to_string(), parsed.clone());
    parsed
}

#[cfg(test)]
pub(crate) fn is_compiled(css: &str) -> bool {
    COMPILED
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .contains_key(css)
}
