//! Page abstraction
//!
//! The engine never touches a live document directly. It asks a [`Page`]
//! for HTML snapshots and for the few interactions that make an
//! adversarial source reveal more results.

mod sim;
pub mod types;

pub use sim::SimPage;
pub use types::*;

use async_trait::async_trait;
use url::Url;

use crate::error::Result;

#[async_trait]
pub trait Page: Send {
    /// URL used to resolve relative links, if known.
    fn url(&self) -> Option<Url>;

    /// Current document HTML.
    async fn snapshot(&mut self) -> Result<String>;

    /// Click the element at `target`. `Ok(false)` if it is gone or disabled.
    async fn click(&mut self, target: &ElementPath) -> Result<bool>;

    async fn scroll_by(&mut self, dy: i64) -> Result<()>;

    async fn scroll_to_bottom(&mut self) -> Result<()>;
}
