use scraper::{ElementRef, Selector};
use url::Url;

use crate::selectors::compile;
use crate::tools::types::normalize_space;

use super::types::{Css, Sibling, TextMatch, TextMode};

/// Descendant text of an element, trimmed.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Resolve an `href` against the page URL; fall back to the raw value.
pub(crate) fn resolve_href(href: &str, base: Option<&Url>) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    let resolved = match base {
        Some(b) => b.join(href),
        None => Url::parse(href),
    };
    resolved.map(|u| u.to_string()).unwrap_or_else(|_| href.to_string())
}

/// Nearest ancestor of `el` matching `sel`, never climbing past `root`.
pub(crate) fn nearest_ancestor<'a>(
    el: ElementRef<'a>,
    sel: &Selector,
    root: ElementRef<'a>,
) -> Option<ElementRef<'a>> {
    for node in el.ancestors() {
        let Some(anc) = ElementRef::wrap(node) else {
            break;
        };
        if sel.matches(&anc) {
            return Some(anc);
        }
        if anc.id() == root.id() {
            break;
        }
    }
    None
}

pub(super) fn css_candidates<'a>(loc: &Css, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    match compile(&loc.css) {
        Some(sel) => root.select(&sel).collect(),
        None => Vec::new(),
    }
}

pub(super) fn css_first<'a>(loc: &Css, root: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let sel = compile(&loc.css)?;
    root.select(&sel).next()
}

pub(super) fn sibling_candidates<'a>(loc: &Sibling, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let (Some(anchor), Some(ancestor), Some(sibling)) = (
        compile(&loc.anchor),
        compile(&loc.ancestor),
        compile(&loc.sibling),
    ) else {
        return Vec::new();
    };
    if loc.nth == 0 {
        return Vec::new();
    }

    let mut out: Vec<ElementRef<'a>> = Vec::new();
    for a in root.select(&anchor) {
        let Some(anc) = nearest_ancestor(a, &ancestor, root) else {
            continue;
        };
        let hit = anc
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .filter(|s| sibling.matches(s))
            .nth(loc.nth - 1);
        if let Some(hit) = hit {
            if !out.iter().any(|o| o.id() == hit.id()) {
                out.push(hit);
            }
        }
    }
    out
}

pub(super) fn text_candidates<'a>(loc: &TextMatch, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let Some(sel) = compile(&loc.css) else {
        return Vec::new();
    };
    let descend = match &loc.descend {
        Some(css) => match compile(css) {
            Some(s) => Some(s),
            None => return Vec::new(),
        },
        None => None,
    };
    let needle = if loc.ignore_case {
        loc.needle.to_lowercase()
    } else {
        loc.needle.clone()
    };

    root.select(&sel)
        .filter(|el| {
            let mut text = normalize_space(&el.text().collect::<String>());
            if loc.ignore_case {
                text = text.to_lowercase();
            }
            match loc.mode {
                TextMode::Contains => text.contains(&needle),
                TextMode::StartsWith => text.starts_with(&needle),
            }
        })
        .filter_map(|el| match &descend {
            Some(d) => el.select(d).next(),
            None => Some(el),
        })
        .collect()
}

/// A control counts as enabled unless it is `disabled` or `aria-disabled="true"`.
pub(crate) fn is_enabled(el: ElementRef<'_>) -> bool {
    let v = el.value();
    v.attr("disabled").is_none() && v.attr("aria-disabled") != Some("true")
}
