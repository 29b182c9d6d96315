//! Live update subscription. The hosted store's own push transport is its
//! business; from this client's side a subscription is a spawned poller
//! that diffs the recent window into insert/update events and delivers
//! them in arrival order. Dropping the `Subscription` aborts the task, so
//! nothing mutates state after teardown.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use lovewall_shared::LiveEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::remote::{RemoteStore, FEED_WINDOW};

pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(5);

pub struct Subscription {
    rx: mpsc::Receiver<LiveEvent>,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// The next event, or `None` once the channel is closed.
    pub async fn next_event(&mut self) -> Option<LiveEvent> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Subscribe to inserts and updates on the feed and reply tables.
pub fn watch_remote(store: Arc<dyn RemoteStore>, period: Duration) -> Subscription {
    let (tx, rx) = mpsc::channel(64);
    let handle = tokio::spawn(poll_loop(store, tx, period));
    Subscription { rx, handle }
}

async fn poll_loop(store: Arc<dyn RemoteStore>, tx: mpsc::Sender<LiveEvent>, period: Duration) {
    // id -> last seen like count; the first poll only establishes the
    // baseline so warm-start rows are not replayed as inserts.
    let mut seen_posts: HashMap<i64, i64> = HashMap::new();
    let mut seen_replies: HashSet<i64> = HashSet::new();
    let mut baseline = true;

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        match store.recent_responses(FEED_WINDOW).await {
            Ok(rows) => {
                // Oldest first, so a burst of inserts arrives in order.
                for row in rows.into_iter().rev() {
                    let likes = row.likes.unwrap_or(0);
                    match seen_posts.get(&row.id) {
                        None => {
                            seen_posts.insert(row.id, likes);
                            if !baseline && tx.send(LiveEvent::PostInserted(row)).await.is_err() {
                                return;
                            }
                        }
                        Some(prev) if *prev != likes => {
                            seen_posts.insert(row.id, likes);
                            if !baseline && tx.send(LiveEvent::PostUpdated(row)).await.is_err() {
                                return;
                            }
                        }
                        Some(_) => {}
                    }
                }
            }
            Err(e) => debug!(error = %e, "live poll of responses failed"),
        }

        match store.recent_replies(FEED_WINDOW * 4).await {
            Ok(rows) => {
                for row in rows.into_iter().rev() {
                    if seen_replies.insert(row.id)
                        && !baseline
                        && tx.send(LiveEvent::ReplyInserted(row)).await.is_err()
                    {
                        return;
                    }
                }
            }
            Err(e) => debug!(error = %e, "live poll of replies failed"),
        }

        baseline = false;
    }
}
