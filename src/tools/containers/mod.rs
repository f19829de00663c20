//! Container Locator

mod tests;
pub mod types;
mod utils;

pub use types::*;
use utils::*;

use scraper::Html;

/// Find result containers in a snapshot.
///
/// Patterns are tried in order and the first one with any match is used
/// wholesale; results of different patterns are never merged. When every
/// pattern comes up empty the fallback rule (if any) infers containers from
/// leaf anchors, and the returned set is flagged `is_fallback`.
pub fn locate_containers<'a>(
    doc: &'a Html,
    patterns: &[ContainerPattern],
    fallback: Option<&FallbackRule>,
) -> ContainerSet<'a> {
    for pattern in patterns {
        let found = pattern_matches(doc, pattern);
        if !found.is_empty() {
            tracing::debug!(strategy = %pattern.label(), count = found.len(), "containers located");
            return ContainerSet {
                containers: found,
                strategy: Some(pattern.label()),
                is_fallback: false,
            };
        }
    }

    if let Some(rule) = fallback {
        let inferred = infer_from_anchors(doc, rule);
        if !inferred.is_empty() {
            tracing::warn!(count = inferred.len(), "using anchor-based fallback container detection");
            return ContainerSet {
                containers: inferred,
                strategy: Some(FALLBACK_STRATEGY.to_string()),
                is_fallback: true,
            };
        }
    }

    ContainerSet::empty()
}
