use serde::{Deserialize, Serialize};

use crate::tools::extract::LocatorChain;

/// How a profile coaxes its source into revealing more results.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PaginationConfig {
    /// "Next page" controls first, then "load more" controls.
    pub affordances: LocatorChain,
    /// Base wait between a trigger and the next scan.
    pub wait_ms: u64,
    /// Share of `wait_ms` spent before the scroll-to-bottom phase.
    pub settle_split: f64,
    /// Downward nudge applied before the first settle phase.
    pub nudge_px: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            affordances: Vec::new(),
            wait_ms: 1600,
            settle_split: 0.5,
            nudge_px: 600,
        }
    }
}

impl PaginationConfig {
    /// The two settle phases for a base wait, in milliseconds.
    pub fn phases(&self, wait_ms: u64) -> (u64, u64) {
        let split = self.settle_split.clamp(0.0, 1.0);
        let first = (wait_ms as f64 * split).round() as u64;
        (first, wait_ms.saturating_sub(first))
    }
}

/// What the driver did to reveal more content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// An explicit control was clicked.
    Clicked,
    /// Nothing clickable; scrolled to the bottom instead.
    Scrolled,
    /// The page refused every interaction.
    Failed,
}

impl Trigger {
    pub fn is_explicit(&self) -> bool {
        matches!(self, Trigger::Clicked)
    }
}
