use scraper::{ElementRef, Html};

use crate::selectors::{compile, KEY_ATTRIBUTES};
use crate::tools::extract::nearest_ancestor;
use crate::tools::types::{string_hash, ContainerKey};

use super::types::{Container, ContainerPattern, FallbackRule};

pub(super) fn pattern_matches<'a>(doc: &'a Html, pattern: &ContainerPattern) -> Vec<Container<'a>> {
    let Some(sel) = compile(&pattern.css) else {
        return Vec::new();
    };
    let has = match &pattern.has {
        Some(css) => match compile(css) {
            Some(h) => Some(h),
            None => return Vec::new(),
        },
        None => None,
    };

    doc.select(&sel)
        .filter(|el| match &has {
            Some(h) => el.select(h).next().is_some(),
            None => true,
        })
        .map(Container::new)
        .collect()
}

pub(super) fn infer_from_anchors<'a>(doc: &'a Html, rule: &FallbackRule) -> Vec<Container<'a>> {
    let (Some(anchor), Some(ancestor)) = (compile(&rule.anchor), compile(&rule.ancestor)) else {
        return Vec::new();
    };
    let root = doc.root_element();

    let mut out: Vec<Container<'a>> = Vec::new();
    for a in doc.select(&anchor) {
        if out.len() >= rule.cap {
            break;
        }
        if let Some(anc) = nearest_ancestor(a, &ancestor, root) {
            if !out.iter().any(|c| c.element().id() == anc.id()) {
                out.push(Container::new(anc));
            }
        }
    }
    out
}

pub(super) fn container_key(el: ElementRef<'_>) -> ContainerKey {
    let v = el.value();
    for attr in KEY_ATTRIBUTES {
        if let Some(val) = v.attr(attr) {
            let val = val.trim();
            if !val.is_empty() {
                return ContainerKey(format!("{attr}={val}"));
            }
        }
    }
    ContainerKey(format!("h_{:x}", string_hash(&el.html())))
}
