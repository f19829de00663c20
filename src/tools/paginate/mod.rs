//! Pagination/Scroll Driver

pub mod types;

pub use types::*;

use std::time::Duration;

use scraper::Html;
use tokio_util::sync::CancellationToken;

use crate::page::{ElementPath, Page};
use crate::tools::extract::{find_first_where, is_enabled, Locator};

/// First enabled affordance in the snapshot, as a clickable path.
pub fn find_affordance(html: &str, affordances: &[Locator]) -> Option<ElementPath> {
    let doc = Html::parse_document(html);
    find_first_where(affordances, doc.root_element(), is_enabled).map(ElementPath::of)
}

/// Click the first enabled affordance in `html`, else scroll to the bottom.
///
/// Page interaction failures are absorbed; the controller carries on the
/// same way whatever this returns.
pub async fn trigger_more<P: Page + ?Sized>(page: &mut P, html: &str, affordances: &[Locator]) -> Trigger {
    if let Some(target) = find_affordance(html, affordances) {
        match page.click(&target).await {
            Ok(true) => return Trigger::Clicked,
            Ok(false) => tracing::debug!(?target, "affordance not clickable"),
            Err(e) => tracing::debug!(error = %e, "click failed"),
        }
    }
    match page.scroll_to_bottom().await {
        Ok(()) => Trigger::Scrolled,
        Err(e) => {
            tracing::debug!(error = %e, "scroll failed");
            Trigger::Failed
        }
    }
}

/// Give the source time to render: nudge, wait, scroll to bottom, wait.
///
/// Returns `false` as soon as cancellation is observed after a wait.
pub async fn settle<P: Page + ?Sized>(
    page: &mut P,
    config: &PaginationConfig,
    wait_ms: u64,
    cancel: &CancellationToken,
) -> bool {
    let (first, second) = config.phases(wait_ms);

    if let Err(e) = page.scroll_by(config.nudge_px).await {
        tracing::debug!(error = %e, "nudge failed");
    }
    tokio::time::sleep(Duration::from_millis(first)).await;
    if cancel.is_cancelled() {
        return false;
    }

    if let Err(e) = page.scroll_to_bottom().await {
        tracing::debug!(error = %e, "scroll failed");
    }
    tokio::time::sleep(Duration::from_millis(second)).await;
    !cancel.is_cancelled()
}
