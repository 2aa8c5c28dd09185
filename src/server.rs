//! The crawl server entry-point seam.

use crate::error::Result;
use serde_json::Value;
use std::future::Future;

/// The start contract the bootstrap delegates to.
///
/// The bootstrap hands the assembled configuration to `start` exactly
/// once; everything past that point (listening, scheduling, crawling)
/// belongs to the implementation.
pub trait Server {
    fn start(self, config: Value) -> impl Future<Output = Result<()>> + Send;
}
