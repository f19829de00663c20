use std::path::Path;

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use super::types::{ElementPath, PageStats, RevealOn};
use super::Page;
use crate::error::{Result, ScrapeError};
use crate::tools::extract::is_enabled;

/// In-memory page that replays a fixed sequence of HTML frames.
///
/// Each reveal (a click or a scroll to the bottom, depending on
/// [`RevealOn`]) advances to the next frame; the last frame sticks.
#[derive(Debug, Clone)]
pub struct SimPage {
    frames: Vec<String>,
    cursor: usize,
    reveal: RevealOn,
    url: Option<Url>,
    stats: PageStats,
}

impl SimPage {
    pub fn new(frames: Vec<String>, reveal: RevealOn) -> Self {
        Self {
            frames,
            cursor: 0,
            reveal,
            url: None,
            stats: PageStats::default(),
        }
    }

    pub fn single(html: impl Into<String>) -> Self {
        Self::new(vec![html.into()], RevealOn::Click)
    }

    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Load saved HTML captures, one frame per file, in the given order.
    pub fn from_files<P: AsRef<Path>>(paths: &[P], reveal: RevealOn) -> Result<Self> {
        let frames = paths
            .iter()
            .map(std::fs::read_to_string)
            .collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self::new(frames, reveal))
    }

    pub fn stats(&self) -> PageStats {
        self.stats
    }

    pub fn frame_index(&self) -> usize {
        self.cursor
    }

    fn advance(&mut self) {
        if self.cursor + 1 < self.frames.len() {
            self.cursor += 1;
            tracing::debug!(frame = self.cursor, "revealed next frame");
        }
    }

    fn current(&self) -> Result<&str> {
        self.frames
            .get(self.cursor)
            .map(|s| s.as_str())
            .ok_or_else(|| ScrapeError::page("page has no content"))
    }
}

#[async_trait]
impl Page for SimPage {
    fn url(&self) -> Option<Url> {
        self.url.clone()
    }

    async fn snapshot(&mut self) -> Result<String> {
        self.stats.snapshots += 1;
        self.current().map(str::to_string)
    }

    async fn click(&mut self, target: &ElementPath) -> Result<bool> {
        let clickable = {
            let doc = Html::parse_document(self.current()?);
            target.resolve(&doc).map(is_enabled).unwrap_or(false)
        };
        if !clickable {
            return Ok(false);
        }
        self.stats.clicks += 1;
        if self.reveal == RevealOn::Click {
            self.advance();
        }
        Ok(true)
    }

    async fn scroll_by(&mut self, _dy: i64) -> Result<()> {
        self.stats.scrolls += 1;
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.stats.scrolls += 1;
        if self.reveal == RevealOn::Scroll {
            self.advance();
        }
        Ok(())
    }
}
