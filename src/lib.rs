#![doc = include_str!("../README.md")]

pub mod cli;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod page;
pub mod profiles;
pub mod selectors;
pub mod tools;
pub mod types;


pub use engine::*;
pub use error::*;
pub use events::*;
pub use host::{Host, Received, Reply, Request};
pub use page::{ElementPath, Page, RevealOn, SimPage};
pub use profiles::{Profile, ProfileKind};
pub use tools::assemble::Record;
pub use tools::export::ExportFormat;
pub use types::*;
