use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use crate::tools::types::ContainerKey;

/// Document-wide pattern for result containers.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ContainerPattern {
    pub css: String,
    /// Keep only matches with at least one descendant matching this selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has: Option<String>,
}

impl ContainerPattern {
    pub fn new(css: &str) -> Self {
        Self {
            css: css.into(),
            has: None,
        }
    }
    pub fn has(mut self, css: &str) -> Self {
        self.has = Some(css.into());
        self
    }

    /// Human-readable label used as the strategy name.
    pub fn label(&self) -> String {
        match &self.has {
            Some(h) => format!("{} :has({})", self.css, h),
            None => self.css.clone(),
        }
    }
}

fn default_cap() -> usize {
    50
}

/// Last-resort inference: climb from each leaf anchor to its nearest `ancestor`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FallbackRule {
    pub anchor: String,
    pub ancestor: String,
    #[serde(default = "default_cap")]
    pub cap: usize,
}

impl FallbackRule {
    pub fn new(anchor: &str, ancestor: &str) -> Self {
        Self {
            anchor: anchor.into(),
            ancestor: ancestor.into(),
            cap: default_cap(),
        }
    }
}

/// Strategy name reported when containers were inferred from anchors.
pub const FALLBACK_STRATEGY: &str = "fallback_anchor_ancestor";

/// One result's root node, valid for the pass that parsed it.
#[derive(Debug, Clone, Copy)]
pub struct Container<'a> {
    el: ElementRef<'a>,
}

impl<'a> Container<'a> {
    pub fn new(el: ElementRef<'a>) -> Self {
        Self { el }
    }

    pub fn element(&self) -> ElementRef<'a> {
        self.el
    }

    /// Key used to recognise this container in later snapshots.
    pub fn key(&self) -> ContainerKey {
        super::utils::container_key(self.el)
    }
}

/// Result of one container lookup.
#[derive(Debug, Clone)]
pub struct ContainerSet<'a> {
    pub containers: Vec<Container<'a>>,
    pub strategy: Option<String>,
    pub is_fallback: bool,
}

impl<'a> ContainerSet<'a> {
    pub fn empty() -> Self {
        Self {
            containers: Vec::new(),
            strategy: None,
            is_fallback: false,
        }
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
