use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

/// Address of an element as child-element indices from the document node.
///
/// This is how the engine tells a live page which control to click: the
/// page resolves the same path in its own tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementPath(pub Vec<usize>);

impl ElementPath {
    pub fn of(el: ElementRef<'_>) -> Self {
        let mut indices = Vec::new();
        let mut node = *el;
        while let Some(parent) = node.parent() {
            let pos = node
                .prev_siblings()
                .filter(|n| n.value().is_element())
                .count();
            indices.push(pos);
            node = parent;
        }
        indices.reverse();
        ElementPath(indices)
    }

    pub fn resolve<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        let mut node = doc.tree.root();
        for &i in &self.0 {
            node = node.children().filter(|n| n.value().is_element()).nth(i)?;
        }
        ElementRef::wrap(node)
    }
}

/// Which interaction makes a simulated page reveal its next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RevealOn {
    /// Paginated results: clicking an enabled control loads the next page.
    #[default]
    Click,
    /// Lazy loading: scrolling to the bottom appends more results.
    Scroll,
}

/// Interaction counters, mostly for tests and run summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStats {
    pub snapshots: usize,
    pub clicks: usize,
    pub scrolls: usize,
}
