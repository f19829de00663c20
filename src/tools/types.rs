//! Common types shared across tools

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a record, derived from its identity-bearing fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    /// Hash the given parts joined with `|`.
    pub fn of<S: AsRef<str>>(parts: &[S]) -> Self {
        let joined = parts
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join("|");
        Fingerprint(format!("p_{:x}", string_hash(&joined)))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a container across snapshots of the same page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerKey(pub String);

/// 32-bit `h * 31 + unit` hash over UTF-16 code units, wrapping.
pub fn string_hash(s: &str) -> u32 {
    let mut h: i32 = 0;
    for unit in s.encode_utf16() {
        h = (h << 5).wrapping_sub(h).wrapping_add(unit as i32);
    }
    h as u32
}

/// Collapse runs of whitespace and trim, like XPath `normalize-space`.
pub fn normalize_space(text: &str) -> String {
    crate::selectors::WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
