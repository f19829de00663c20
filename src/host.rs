//! Message host
//!
//! One `Host` per page context. It owns the controller, answers requests
//! in the `ApiResponse` envelope, and lets `cancel` through while a run
//! holds the controller.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::engine::{AutoOptions, PageInfo, Scraper};
use crate::events::EventSink;
use crate::page::Page;
use crate::profiles::Profile;
use crate::tools::assemble::Record;
use crate::types::ApiResponse;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    Ping,
    ScrapeStatic {
        #[serde(default)]
        limit: Option<usize>,
    },
    ScrapeAuto {
        #[serde(default)]
        limit: Option<usize>,
        #[serde(default)]
        options: AutoOptions,
    },
    Cancel,
    #[serde(rename = "get_page_info", alias = "page_info")]
    PageInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Ready {
        loaded: bool,
        profile: String,
    },
    Static {
        mode: &'static str,
        records: Vec<Record>,
        count: usize,
    },
    Auto {
        mode: &'static str,
        records: Vec<Record>,
        count: usize,
        cancelled: bool,
    },
    Cancelling {
        cancelling: bool,
    },
    PageInfo(PageInfo),
}

/// A request stamped with the cancel generation it arrived in.
#[derive(Debug)]
pub struct Received {
    request: Request,
    cancel: CancellationToken,
}

impl Received {
    pub fn request(&self) -> &Request {
        &self.request
    }
}

pub struct Host<P: Page> {
    scraper: tokio::sync::Mutex<Scraper<P>>,
    /// Parent of every run received since the last cancel.
    generation: Mutex<CancellationToken>,
    sink: Arc<dyn EventSink>,
    profile_name: String,
    default_limit: usize,
}

impl<P: Page> Host<P> {
    pub fn install(page: P, profile: Profile, sink: Arc<dyn EventSink>) -> Self {
        tracing::info!(profile = %profile.name, "host installed");
        Self {
            profile_name: profile.name.clone(),
            default_limit: profile.default_limit,
            scraper: tokio::sync::Mutex::new(Scraper::new(page, profile)),
            generation: Mutex::new(CancellationToken::new()),
            sink,
        }
    }

    /// A host only exists once installed on its page.
    pub fn is_installed(&self) -> bool {
        true
    }

    /// Cancel every auto run received so far, running or still queued.
    /// Later requests start a new generation. Idempotent.
    pub fn cancel(&self) {
        let mut current = self.generation.lock().unwrap_or_else(|e| e.into_inner());
        current.cancel();
        *current = CancellationToken::new();
    }

    /// Admit a request in arrival order. A `cancel` takes effect here,
    /// before any earlier request has reached the controller.
    pub fn receive(&self, request: Request) -> Received {
        if matches!(request, Request::Cancel) {
            self.cancel();
        }
        let cancel = self
            .generation
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .child_token();
        Received { request, cancel }
    }

    pub async fn handle(&self, request: Request) -> ApiResponse<Reply> {
        let received = self.receive(request);
        self.run(received).await
    }

    /// Answer a request admitted by [`Host::receive`].
    pub async fn run(&self, received: Received) -> ApiResponse<Reply> {
        let Received { request, cancel } = received;
        match request {
            Request::Ping => ApiResponse::ok(Reply::Ready {
                loaded: self.is_installed(),
                profile: self.profile_name.clone(),
            }),
            Request::ScrapeStatic { limit } => {
                let limit = limit.filter(|&n| n > 0).unwrap_or(self.default_limit);
                let mut scraper = self.scraper.lock().await;
                scraper
                    .scrape_static(limit)
                    .await
                    .map(|records| Reply::Static {
                        mode: "static",
                        count: records.len(),
                        records,
                    })
                    .into()
            }
            Request::ScrapeAuto { limit, options } => {
                let opts = AutoOptions {
                    limit: limit.filter(|&n| n > 0).or(options.limit),
                    ..options
                };
                let mut scraper = self.scraper.lock().await;
                scraper
                    .scrape_auto(&opts, &cancel, self.sink.as_ref())
                    .await
                    .map(|outcome| Reply::Auto {
                        mode: "auto",
                        records: outcome.records,
                        count: outcome.count,
                        cancelled: outcome.cancelled,
                    })
                    .into()
            }
            Request::Cancel => ApiResponse::ok(Reply::Cancelling { cancelling: true }),
            Request::PageInfo => {
                let mut scraper = self.scraper.lock().await;
                scraper.page_info().await.map(Reply::PageInfo).into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parsing() {
        let r: Request = serde_json::from_str(r#"{"action":"ping"}"#).unwrap();
        assert_eq!(r, Request::Ping);

        let r: Request = serde_json::from_str(r#"{"action":"scrape_static","limit":10}"#).unwrap();
        assert_eq!(r, Request::ScrapeStatic { limit: Some(10) });

        let r: Request =
            serde_json::from_str(r#"{"action":"scrape_auto","limit":50,"options":{"waitMs":1600}}"#).unwrap();
        match r {
            Request::ScrapeAuto { limit, options } => {
                assert_eq!(limit, Some(50));
                assert_eq!(options.wait_ms, Some(1600));
                assert_eq!(options.stall_after, 5);
                assert!(!options.fresh);
            }
            other => panic!("unexpected request {other:?}"),
        }

        let r: Request = serde_json::from_str(r#"{"action":"scrape_auto"}"#).unwrap();
        assert_eq!(
            r,
            Request::ScrapeAuto {
                limit: None,
                options: AutoOptions::default()
            }
        );
    }

    #[test]
    fn test_page_info_request_names() {
        let r: Request = serde_json::from_str(r#"{"action":"get_page_info"}"#).unwrap();
        assert_eq!(r, Request::PageInfo);
        let r: Request = serde_json::from_str(r#"{"action":"page_info"}"#).unwrap();
        assert_eq!(r, Request::PageInfo);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(serde_json::from_str::<Request>(r#"{"action":"explode"}"#).is_err());
    }

    #[test]
    fn test_reply_shapes() {
        assert_eq!(
            serde_json::to_value(Reply::Cancelling { cancelling: true }).unwrap(),
            serde_json::json!({"cancelling": true})
        );
        assert_eq!(
            serde_json::to_value(Reply::Static {
                mode: "static",
                records: vec![],
                count: 0
            })
            .unwrap(),
            serde_json::json!({"mode": "static", "records": [], "count": 0})
        );
        assert_eq!(
            serde_json::to_value(Reply::PageInfo(PageInfo {
                url: None,
                strategy: Some("li".into()),
                container_count: 3,
                is_fallback: false,
            }))
            .unwrap(),
            serde_json::json!({"url": null, "strategy": "li", "containerCount": 3, "isFallback": false})
        );
    }
}
