pub mod common;
pub mod config;
pub mod error;
pub mod lila;
pub mod mirror;
pub mod summary;

pub use config::MirrorConfig;
pub use error::{MirrorError, Result};
pub use lila::{LocalClient, SourceClient};
pub use mirror::{BroadcastSink, BroadcastSource, Mirror};
pub use summary::{RoundOutcome, RoundRecord, RunSummary};
