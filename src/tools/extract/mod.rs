//! Field Extractor
//!
//! Every locator is scoped to the element it is handed. Malformed selectors
//! and missing nodes are soft misses: the chain moves on and an exhausted
//! chain yields an empty string.

mod tests;
pub mod types;
pub(crate) mod utils;

pub use types::*;
pub(crate) use utils::{element_text, is_enabled, nearest_ancestor};
use utils::*;

use scraper::ElementRef;
use url::Url;

/// A single way of finding an element under a root.
pub trait Locate {
    /// Every element this locator accepts under `root`, in document order.
    fn candidates<'a>(&self, root: ElementRef<'a>) -> Vec<ElementRef<'a>>;

    /// The element this locator picks under `root`, if any.
    fn try_match<'a>(&self, root: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.candidates(root).into_iter().next()
    }
}

impl Locate for Css {
    fn candidates<'a>(&self, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        css_candidates(self, root)
    }
    fn try_match<'a>(&self, root: ElementRef<'a>) -> Option<ElementRef<'a>> {
        css_first(self, root)
    }
}

impl Locate for Sibling {
    fn candidates<'a>(&self, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        sibling_candidates(self, root)
    }
}

impl Locate for TextMatch {
    fn candidates<'a>(&self, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        text_candidates(self, root)
    }
}

impl Locate for Locator {
    fn candidates<'a>(&self, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        match self {
            Locator::Css(l) => l.candidates(root),
            Locator::Sibling(l) => l.candidates(root),
            Locator::Text(l) => l.candidates(root),
        }
    }
    fn try_match<'a>(&self, root: ElementRef<'a>) -> Option<ElementRef<'a>> {
        match self {
            Locator::Css(l) => l.try_match(root),
            Locator::Sibling(l) => l.try_match(root),
            Locator::Text(l) => l.try_match(root),
        }
    }
}

/// Read one field from `container`: the first locator whose value is non-empty wins.
pub fn extract_field(field: &FieldSpec, container: ElementRef<'_>, base: Option<&Url>) -> String {
    match field.kind {
        FieldKind::Text => extract_text(&field.locators, container),
        FieldKind::Link => extract_link(&field.locators, container, base),
    }
}

/// First non-empty trimmed text along the chain.
pub fn extract_text(chain: &[Locator], container: ElementRef<'_>) -> String {
    first_value(chain, container, element_text)
}

/// First non-empty `href` along the chain, resolved against `base`.
pub fn extract_link(chain: &[Locator], container: ElementRef<'_>, base: Option<&Url>) -> String {
    first_value(chain, container, |el| {
        el.value()
            .attr("href")
            .map(|h| resolve_href(h, base))
            .unwrap_or_default()
    })
}

/// First element along the chain that satisfies `accept`.
///
/// Unlike field reads, each locator is allowed to skip past rejected
/// candidates (e.g. a disabled "next" button before an enabled one).
pub fn find_first_where<'a, F>(chain: &[Locator], root: ElementRef<'a>, accept: F) -> Option<ElementRef<'a>>
where
    F: Fn(ElementRef<'a>) -> bool,
{
    chain
        .iter()
        .find_map(|loc| loc.candidates(root).into_iter().find(|el| accept(*el)))
}

fn first_value<F>(chain: &[Locator], container: ElementRef<'_>, read: F) -> String
where
    F: Fn(ElementRef<'_>) -> String,
{
    for loc in chain {
        if let Some(el) = loc.try_match(container) {
            let value = read(el);
            if !value.is_empty() {
                return value;
            }
        }
    }
    String::new()
}
