//! The remote CRUD store seam. The real store is an external service; the
//! engine only ever talks to this trait, so tests run against the
//! in-memory fake.

use async_trait::async_trait;
use lovewall_shared::{NewReply, NewResponse, ReplyRow, ResponseRow};

use crate::error::EngineResult;

mod http;
mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

/// How many posts the clients keep in view; reads never ask for more.
pub const FEED_WINDOW: usize = 40;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// The most recent posts, newest first.
    async fn recent_responses(&self, limit: usize) -> EngineResult<Vec<ResponseRow>>;

    /// Insert a post. The payload omits server-assigned columns; the
    /// returned row carries the authoritative id and timestamp.
    async fn insert_response(&self, new: &NewResponse) -> EngineResult<ResponseRow>;

    /// Recent replies across the feed window, newest first.
    async fn recent_replies(&self, limit: usize) -> EngineResult<Vec<ReplyRow>>;

    async fn insert_reply(&self, new: &NewReply) -> EngineResult<ReplyRow>;
}
