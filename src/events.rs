//! Outbound notifications
//!
//! Progress and cancellation events are part of the run contract: a sink
//! that cannot deliver them is an engine fault. Record events are live
//! previews and never affect the outcome.

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::{Result, ScrapeError};
use crate::tools::assemble::Record;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScrapeEvent {
    Progress {
        count: usize,
        limit: usize,
        iterations: usize,
    },
    Cancelled,
    Record {
        record: Record,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ScrapeEvent) -> Result<()>;
}

impl EventSink for UnboundedSender<ScrapeEvent> {
    fn emit(&self, event: ScrapeEvent) -> Result<()> {
        self.send(event)
            .map_err(|e| ScrapeError::Channel(format!("{} event dropped", event_name(&e.0))))
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: ScrapeEvent) -> Result<()> {
        Ok(())
    }
}

/// Reports progress through `tracing`, for runs without a listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: ScrapeEvent) -> Result<()> {
        match event {
            ScrapeEvent::Progress {
                count,
                limit,
                iterations,
            } => tracing::info!(count, limit, iterations, "progress"),
            ScrapeEvent::Cancelled => tracing::warn!("scrape cancelled"),
            ScrapeEvent::Record { .. } => {}
        }
        Ok(())
    }
}

fn event_name(event: &ScrapeEvent) -> &'static str {
    match event {
        ScrapeEvent::Progress { .. } => "progress",
        ScrapeEvent::Cancelled => "cancelled",
        ScrapeEvent::Record { .. } => "record",
    }
}
