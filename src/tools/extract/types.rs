use serde::{Deserialize, Serialize};

/// Ordered candidates for one logical field. Stricter, newer patterns come
/// first; broad legacy fallbacks come last.
pub type LocatorChain = Vec<Locator>;

/// First descendant matching a CSS selector.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Css {
    pub css: String,
}

/// Anchor-proximity match: find `anchor`, climb to its nearest `ancestor`,
/// then take the `nth` (1-based) following sibling matching `sibling`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Sibling {
    pub anchor: String,
    pub ancestor: String,
    pub sibling: String,
    pub nth: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    #[default]
    Contains,
    StartsWith,
}

/// Text-content match over whitespace-normalized element text.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TextMatch {
    pub css: String,
    pub needle: String,
    #[serde(default)]
    pub mode: TextMode,
    #[serde(default)]
    pub ignore_case: bool,
    /// Return this descendant of the matched element instead of the element itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descend: Option<String>,
}

impl TextMatch {
    pub fn new(css: &str, needle: &str) -> Self {
        Self {
            css: css.into(),
            needle: needle.into(),
            mode: TextMode::Contains,
            ignore_case: false,
            descend: None,
        }
    }
    pub fn starts_with(mut self) -> Self {
        self.mode = TextMode::StartsWith;
        self
    }
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
    pub fn descend(mut self, css: &str) -> Self {
        self.descend = Some(css.into());
        self
    }
}

/// One candidate pattern in a locator chain.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    Css(Css),
    Sibling(Sibling),
    Text(TextMatch),
}

impl Locator {
    pub fn css(css: &str) -> Self {
        Locator::Css(Css { css: css.into() })
    }
    pub fn sibling(anchor: &str, ancestor: &str, sibling: &str, nth: usize) -> Self {
        Locator::Sibling(Sibling {
            anchor: anchor.into(),
            ancestor: ancestor.into(),
            sibling: sibling.into(),
            nth,
        })
    }
}

impl From<TextMatch> for Locator {
    fn from(t: TextMatch) -> Self {
        Locator::Text(t)
    }
}

/// How a field's value is read off the matched element.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    /// `href`, resolved to an absolute URL when the page URL is known.
    Link,
}

/// A named output column and the chain that fills it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
    pub locators: LocatorChain,
}

impl FieldSpec {
    pub fn text(name: &str, locators: LocatorChain) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
            locators,
        }
    }
    pub fn link(name: &str, locators: LocatorChain) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Link,
            locators,
        }
    }
}
