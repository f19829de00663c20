//! Scrape Controller
//!
//! Drives one page through repeated scan / reveal / settle cycles until the
//! collection is full, the source stops producing, or the caller cancels.

use std::collections::HashSet;
use std::time::Duration;

use scraper::Html;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Result;
use crate::events::{EventSink, ScrapeEvent};
use crate::page::Page;
use crate::profiles::Profile;
use crate::selectors::compile;
use crate::tools::assemble::{assemble, Record};
use crate::tools::containers::locate_containers;
use crate::tools::extract::Locate;
use crate::tools::paginate::{settle, trigger_more};
use crate::tools::store::CollectionStore;
use crate::tools::types::ContainerKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    Stalled,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Cancelled | RunState::Stalled)
    }
}

fn default_stall_after() -> usize {
    5
}
fn default_progress_interval_ms() -> u64 {
    700
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoOptions {
    /// Falls back to the profile's default limit.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Falls back to the profile's pagination wait.
    #[serde(default)]
    pub wait_ms: Option<u64>,
    /// Consecutive scans without a new record before the run stalls.
    #[serde(default = "default_stall_after")]
    pub stall_after: usize,
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,
    /// Forget which containers earlier runs already processed.
    #[serde(default)]
    pub fresh: bool,
}

impl Default for AutoOptions {
    fn default() -> Self {
        Self {
            limit: None,
            wait_ms: None,
            stall_after: default_stall_after(),
            progress_interval_ms: default_progress_interval_ms(),
            fresh: false,
        }
    }
}

impl AutoOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
    pub fn with_wait_ms(mut self, wait_ms: u64) -> Self {
        self.wait_ms = Some(wait_ms);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeOutcome {
    pub records: Vec<Record>,
    pub count: usize,
    pub cancelled: bool,
    pub state: RunState,
    pub iterations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Set when the run stalled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<FieldDiagnostics>,
}

/// Whole-document match counts, for telling "no more results" apart from
/// "the markup moved".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDiagnostics {
    /// Each schema field with the global hit count of its first locator.
    pub fields: Vec<(String, usize)>,
    /// Elements matching the fallback anchor selector.
    pub anchors: usize,
    /// Elements carrying a `componentkey` attribute.
    pub keyed: usize,
}

impl FieldDiagnostics {
    pub fn collect(doc: &Html, profile: &Profile) -> Self {
        let root = doc.root_element();
        let fields = profile
            .schema
            .fields
            .iter()
            .map(|f| {
                let hits = f.locators.first().map_or(0, |loc| loc.candidates(root).len());
                (f.name.clone(), hits)
            })
            .collect();
        let count = |css: &str| compile(css).map_or(0, |sel| doc.select(&sel).count());

        Self {
            fields,
            anchors: profile.fallback.as_ref().map_or(0, |rule| count(&rule.anchor)),
            keyed: count("[componentkey]"),
        }
    }
}

/// Where containers are found on the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub url: Option<String>,
    pub strategy: Option<String>,
    pub container_count: usize,
    pub is_fallback: bool,
}

/// Records assembled from one snapshot.
struct Scan {
    records: Vec<Record>,
    strategy: Option<String>,
}

pub struct Scraper<P: Page> {
    page: P,
    profile: Profile,
    processed: HashSet<ContainerKey>,
    state: RunState,
}

impl<P: Page> Scraper<P> {
    pub fn new(page: P, profile: Profile) -> Self {
        Self {
            page,
            profile,
            processed: HashSet::new(),
            state: RunState::Idle,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn into_page(self) -> P {
        self.page
    }

    /// Containers already consumed by auto runs on this instance.
    pub fn processed_len(&self) -> usize {
        self.processed.len()
    }

    pub fn reset_processed(&mut self) {
        self.processed.clear();
    }

    /// Container lookup on the current snapshot without assembling records.
    pub async fn page_info(&mut self) -> Result<PageInfo> {
        let html = self.page.snapshot().await?;
        let doc = Html::parse_document(&html);
        let set = locate_containers(&doc, &self.profile.containers, self.profile.fallback.as_ref());
        Ok(PageInfo {
            url: self.page.url().map(|u| u.to_string()),
            container_count: set.len(),
            is_fallback: set.is_fallback,
            strategy: set.strategy,
        })
    }

    /// One pass over the current snapshot, no dedup and no pagination.
    pub async fn scrape_static(&mut self, limit: usize) -> Result<Vec<Record>> {
        let html = self.page.snapshot().await?;
        let base = self.page.url();

        let doc = Html::parse_document(&html);
        let set = locate_containers(&doc, &self.profile.containers, self.profile.fallback.as_ref());
        if set.is_empty() {
            let diagnostics = FieldDiagnostics::collect(&doc, &self.profile);
            tracing::warn!(?diagnostics, "static scrape found no containers");
        }
        let records: Vec<Record> = set
            .containers
            .iter()
            .filter_map(|c| assemble(c, &self.profile.schema, base.as_ref()))
            .take(limit)
            .collect();

        tracing::info!(
            profile = %self.profile.name,
            containers = set.len(),
            count = records.len(),
            strategy = set.strategy.as_deref().unwrap_or("none"),
            "static scrape finished"
        );
        Ok(records)
    }

    /// Collect up to `limit` unique records, revealing more results between scans.
    ///
    /// Stalling and cancellation are normal outcomes. Only a page that
    /// cannot produce a snapshot, or a sink that cannot take a progress or
    /// cancellation event, fails the run.
    pub async fn scrape_auto(
        &mut self,
        opts: &AutoOptions,
        cancel: &CancellationToken,
        sink: &dyn EventSink,
    ) -> Result<ScrapeOutcome> {
        self.state = RunState::Running;
        let result = self.drive(opts, cancel, sink).await;
        match &result {
            Ok(outcome) => self.state = outcome.state,
            Err(e) => {
                self.state = RunState::Idle;
                tracing::warn!(error = %e, "auto scrape aborted");
            }
        }
        result
    }

    async fn drive(
        &mut self,
        opts: &AutoOptions,
        cancel: &CancellationToken,
        sink: &dyn EventSink,
    ) -> Result<ScrapeOutcome> {
        let limit = opts.limit.filter(|&n| n > 0).unwrap_or(self.profile.default_limit);
        let wait_ms = opts.wait_ms.unwrap_or(self.profile.pagination.wait_ms);
        let interval = Duration::from_millis(opts.progress_interval_ms);
        if opts.fresh {
            self.processed.clear();
        }

        let base = self.page.url();
        let mut store = CollectionStore::new(limit);
        let mut iterations = 0usize;
        let mut empty_streak = 0usize;
        let mut strategy: Option<String> = None;
        let mut last_progress: Option<Instant> = None;
        let mut diagnostics = None;

        tracing::info!(profile = %self.profile.name, limit, wait_ms, "auto scrape started");

        let state = loop {
            if cancel.is_cancelled() {
                break RunState::Cancelled;
            }

            let html = self.page.snapshot().await?;
            let scan = self.scan(&html, base.as_ref(), store.remaining());
            if scan.strategy.is_some() && scan.strategy != strategy {
                tracing::debug!(strategy = ?scan.strategy, "container strategy changed");
                strategy = scan.strategy;
            }

            let before = store.len();
            for record in scan.records {
                if store.try_insert(record.clone()) {
                    let _ = sink.emit(ScrapeEvent::Record { record });
                }
            }
            let gained = store.len() - before;
            empty_streak = if gained == 0 { empty_streak + 1 } else { 0 };
            tracing::debug!(iteration = iterations, gained, total = store.len(), "scan finished");

            if last_progress.map_or(true, |t| t.elapsed() >= interval) {
                sink.emit(ScrapeEvent::Progress {
                    count: store.len(),
                    limit,
                    iterations,
                })?;
                last_progress = Some(Instant::now());
            }

            if store.is_full() {
                break RunState::Completed;
            }
            if cancel.is_cancelled() {
                break RunState::Cancelled;
            }
            if empty_streak >= opts.stall_after {
                let found = FieldDiagnostics::collect(&Html::parse_document(&html), &self.profile);
                tracing::warn!(diagnostics = ?found, empty_streak, "no new records, stalling");
                diagnostics = Some(found);
                break RunState::Stalled;
            }

            let trigger = trigger_more(&mut self.page, &html, &self.profile.pagination.affordances).await;
            tracing::debug!(?trigger, "asked for more results");
            let live = settle(&mut self.page, &self.profile.pagination, wait_ms, cancel).await;
            iterations += 1;
            if !live {
                break RunState::Cancelled;
            }
        };

        if state == RunState::Cancelled {
            sink.emit(ScrapeEvent::Cancelled)?;
        }
        sink.emit(ScrapeEvent::Progress {
            count: store.len(),
            limit,
            iterations,
        })?;

        let records = store.into_records();
        tracing::info!(?state, count = records.len(), iterations, "auto scrape finished");
        Ok(ScrapeOutcome {
            count: records.len(),
            cancelled: state == RunState::Cancelled,
            state,
            iterations,
            strategy,
            diagnostics,
            records,
        })
    }

    /// Assemble records from containers not yet processed, at most `remaining`.
    ///
    /// Every visited container is marked processed, whether or not it
    /// yielded a record.
    fn scan(&mut self, html: &str, base: Option<&Url>, remaining: usize) -> Scan {
        let doc = Html::parse_document(html);
        let set = locate_containers(&doc, &self.profile.containers, self.profile.fallback.as_ref());

        let mut records = Vec::new();
        for container in &set.containers {
            if records.len() >= remaining {
                break;
            }
            if !self.processed.insert(container.key()) {
                continue;
            }
            if let Some(record) = assemble(container, &self.profile.schema, base) {
                records.push(record);
            }
        }

        Scan {
            records,
            strategy: set.strategy,
        }
    }
}
