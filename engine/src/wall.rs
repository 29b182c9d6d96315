//! The wall engine: an in-memory feed updated locally first, reconciled
//! against the remote store, merged with live events from other clients,
//! and mirrored to local storage after every change.
//!
//! All state lives behind one mutex that is never held across an await;
//! the feed-changed notification fires synchronously inside each mutation,
//! so observers always see the latest applied change.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::Utc;
use lovewall_shared::{LiveEvent, NewReply, NewResponse, Post, PostId, PostStatus, Reply, ResponseRow};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::alias::client_alias;
use crate::context::AppContext;
use crate::error::{EngineError, EngineResult};
use crate::mirror::Mirror;
use crate::muse::{self, Muse};
use crate::remote::{RemoteStore, FEED_WINDOW};

/// Maximum feed length; oldest entries are dropped first.
pub const MAX_FEED_LEN: usize = 40;

/// Offline walls with fewer posts than this get muse seeding.
const SEED_THRESHOLD: usize = 10;

const RECONCILE_ATTEMPTS: u32 = 3;
const RETRY_BASE: Duration = Duration::from_millis(500);

struct WallState {
    feed: Vec<Post>,
    liked: HashSet<PostId>,
    replied: HashSet<PostId>,
    // Provisional ids with a reconciler currently running.
    in_flight: HashSet<u64>,
}

pub struct Wall {
    mirror: Mirror,
    remote: Option<Arc<dyn RemoteStore>>,
    alias: String,
    state: Mutex<WallState>,
    changed: watch::Sender<u64>,
    next_seq: AtomicU64,
    // Handle to ourselves for spawning background reconcilers.
    weak: Weak<Wall>,
}

impl Wall {
    /// Warm-start from the mirror. Call [`Wall::refresh`] afterwards to
    /// replace the cached window with the remote one.
    pub fn open(ctx: &AppContext) -> Arc<Wall> {
        let mirror = ctx.mirror();
        let feed = mirror.load_feed();
        let liked = mirror.load_liked();
        let replied = mirror.load_replied();
        let alias = client_alias(&mirror);
        // Provisional seqs restart above anything the mirror remembers.
        let next_seq = feed
            .iter()
            .filter_map(|p| match p.id {
                PostId::Provisional(seq) => Some(seq + 1),
                PostId::Authoritative(_) => None,
            })
            .max()
            .unwrap_or(1);
        let (changed, _) = watch::channel(0);

        Arc::new_cyclic(|weak| Wall {
            mirror,
            remote: ctx.remote.clone(),
            alias,
            state: Mutex::new(WallState {
                feed,
                liked,
                replied,
                in_flight: HashSet::new(),
            }),
            changed,
            next_seq: AtomicU64::new(next_seq),
            weak: weak.clone(),
        })
    }

    /// Spawn a background reconciler for the given provisional seq.
    fn spawn_reconcile(&self, seq: u64) {
        if let Some(wall) = self.weak.upgrade() {
            tokio::spawn(async move { wall.reconcile(seq).await });
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn is_offline(&self) -> bool {
        self.remote.is_none()
    }

    /// Snapshot of the feed, newest first.
    pub fn feed(&self) -> Vec<Post> {
        self.state.lock().unwrap().feed.clone()
    }

    /// Feed-changed notifications: the value is a revision counter.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    pub fn has_liked(&self, id: PostId) -> bool {
        self.state.lock().unwrap().liked.contains(&id)
    }

    pub fn has_replied(&self, id: PostId) -> bool {
        self.state.lock().unwrap().replied.contains(&id)
    }

    fn notify(&self) {
        self.changed.send_modify(|rev| *rev += 1);
    }

    // ── Warm start ──

    /// Replace the confirmed window with the remote one, keeping local
    /// provisional entries in front. Falls back to the mirrored feed on
    /// any remote failure.
    pub async fn refresh(&self) -> EngineResult<()> {
        let Some(remote) = self.remote.clone() else {
            return Ok(());
        };
        let rows = match remote.recent_responses(FEED_WINDOW).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "remote read failed, serving mirrored feed");
                return Ok(());
            }
        };
        let replies = remote.recent_replies(FEED_WINDOW * 4).await.unwrap_or_else(|e| {
            debug!(error = %e, "reply read failed");
            Vec::new()
        });

        {
            let mut state = self.state.lock().unwrap();
            let mut feed: Vec<Post> = state
                .feed
                .iter()
                .filter(|p| p.id.is_provisional())
                .cloned()
                .collect();
            for row in rows {
                let mut post: Post = row.into();
                if let Some(post_id) = post.id.authoritative() {
                    post.replies = replies
                        .iter()
                        .filter(|r| r.post_id == post_id)
                        .map(|r| Reply::from(r.clone()))
                        .collect();
                    post.replies.sort_by_key(|r| r.created_at);
                }
                feed.push(post);
            }
            feed.truncate(MAX_FEED_LEN);
            state.feed = feed;
            self.mirror.save_feed(&state.feed);
        }
        self.notify();
        Ok(())
    }

    // ── Optimistic mutator ──

    /// Append a locally-originated post and return it immediately; the
    /// reconciler runs in the background. Offline walls keep the entry
    /// provisional — there is nothing to reconcile against.
    pub fn submit_post(&self, prompt: &str, body: &str) -> EngineResult<Post> {
        let body = body.trim();
        if body.is_empty() {
            return Err(EngineError::EmptyBody);
        }

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let post = Post {
            id: PostId::Provisional(seq),
            author: self.alias.clone(),
            prompt: prompt.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
            likes: 0,
            status: PostStatus::Pending,
            replies: Vec::new(),
        };

        {
            let mut state = self.state.lock().unwrap();
            state.feed.insert(0, post.clone());
            state.feed.truncate(MAX_FEED_LEN);
            self.mirror.save_feed(&state.feed);
        }
        self.notify();

        if self.remote.is_some() {
            self.spawn_reconcile(seq);
        }
        Ok(post)
    }

    /// Re-arm a failed post. A post that is not in the `Failed` state is
    /// left alone.
    pub fn retry_post(&self, id: PostId) -> EngineResult<()> {
        let PostId::Provisional(seq) = id else {
            return Ok(());
        };
        {
            let mut state = self.state.lock().unwrap();
            let Some(post) = state.feed.iter_mut().find(|p| p.id == id) else {
                return Err(EngineError::PostNotFound(id.to_string()));
            };
            if post.status != PostStatus::Failed {
                return Ok(());
            }
            post.status = PostStatus::Pending;
            self.mirror.save_feed(&state.feed);
        }
        self.notify();

        self.spawn_reconcile(seq);
        Ok(())
    }

    // ── Remote reconciler ──

    /// Submit the provisional post `seq` to the remote store and replace
    /// it with the authoritative row. Idempotent: a second invocation for
    /// the same seq, or one for an already-confirmed seq, is a no-op.
    pub(crate) async fn reconcile(&self, seq: u64) {
        let Some(remote) = self.remote.clone() else {
            return;
        };

        let payload = {
            let mut state = self.state.lock().unwrap();
            if !state.in_flight.insert(seq) {
                return; // already reconciling
            }
            let Some(post) = state.feed.iter().find(|p| p.id == PostId::Provisional(seq)) else {
                state.in_flight.remove(&seq);
                return; // already confirmed or evicted
            };
            NewResponse {
                username: post.author.clone(),
                question: post.prompt.clone(),
                answer: post.body.clone(),
            }
        };

        for attempt in 0..RECONCILE_ATTEMPTS {
            match remote.insert_response(&payload).await {
                Ok(row) => {
                    self.confirm(seq, row);
                    self.state.lock().unwrap().in_flight.remove(&seq);
                    return;
                }
                Err(e) => {
                    warn!(seq, attempt, error = %e, "reconcile attempt failed");
                    if attempt + 1 < RECONCILE_ATTEMPTS {
                        tokio::time::sleep(RETRY_BASE * 2u32.pow(attempt)).await;
                    }
                }
            }
        }

        // Retries exhausted: surface the failure instead of stranding a
        // silently-pending entry.
        {
            let mut state = self.state.lock().unwrap();
            if let Some(post) = state.feed.iter_mut().find(|p| p.id == PostId::Provisional(seq)) {
                post.status = PostStatus::Failed;
            }
            state.in_flight.remove(&seq);
            self.mirror.save_feed(&state.feed);
        }
        self.notify();
    }

    /// Rewrite the provisional entry in place with the authoritative row,
    /// preserving feed position, local like count and replies. If a live
    /// echo of the same row already landed, the provisional entry is
    /// dropped instead.
    fn confirm(&self, seq: u64, row: ResponseRow) {
        let provisional = PostId::Provisional(seq);
        let authoritative = PostId::Authoritative(row.id);
        {
            let mut state = self.state.lock().unwrap();
            if state.feed.iter().any(|p| p.id == authoritative) {
                state.feed.retain(|p| p.id != provisional);
            } else if let Some(post) = state.feed.iter_mut().find(|p| p.id == provisional) {
                post.id = authoritative;
                post.created_at = row.created_at;
                post.status = PostStatus::Confirmed;
            } else {
                return;
            }
            if state.liked.remove(&provisional) {
                state.liked.insert(authoritative);
                self.mirror.save_liked(&state.liked);
            }
            self.mirror.save_feed(&state.feed);
        }
        info!(seq, id = row.id, "post confirmed");
        self.notify();
    }

    // ── Live update listener ──

    /// Merge one live event in arrival order; last write wins.
    pub fn apply_live_event(&self, event: LiveEvent) {
        match event {
            LiveEvent::PostInserted(row) => self.apply_insert(row),
            LiveEvent::PostUpdated(row) => self.apply_update(row),
            LiveEvent::ReplyInserted(row) => {
                let reply = Reply::from(row);
                let parent = PostId::Authoritative(reply.post_id);
                let mut changed = false;
                {
                    let mut state = self.state.lock().unwrap();
                    if let Some(post) = state.feed.iter_mut().find(|p| p.id == parent) {
                        if !post.replies.iter().any(|r| r.id == reply.id) {
                            post.replies.push(reply);
                            changed = true;
                        }
                    }
                    if changed {
                        self.mirror.save_feed(&state.feed);
                    }
                }
                if changed {
                    self.notify();
                }
            }
        }
    }

    fn apply_insert(&self, row: ResponseRow) {
        {
            let mut state = self.state.lock().unwrap();
            let duplicate = state.feed.iter().any(|p| {
                p.id == PostId::Authoritative(row.id)
                    // Echo of our own in-flight post; the reconciler owns
                    // that replacement.
                    || (p.id.is_provisional()
                        && p.author == row.username
                        && p.prompt == row.question
                        && p.body == row.answer)
            });
            if duplicate {
                return;
            }
            state.feed.insert(0, Post::from(row));
            state.feed.truncate(MAX_FEED_LEN);
            self.mirror.save_feed(&state.feed);
        }
        self.notify();
    }

    fn apply_update(&self, row: ResponseRow) {
        let mut changed = false;
        {
            let mut state = self.state.lock().unwrap();
            match state
                .feed
                .iter_mut()
                .find(|p| p.id == PostId::Authoritative(row.id))
            {
                Some(post) => {
                    // Merge only the changed field; everything else stays.
                    if let Some(likes) = row.likes {
                        post.likes = likes.max(0) as u32;
                        changed = true;
                    }
                }
                None => {
                    debug!(id = row.id, "update for a post outside the window, discarded");
                }
            }
            if changed {
                self.mirror.save_feed(&state.feed);
            }
        }
        if changed {
            self.notify();
        }
    }

    // ── Likes ──

    /// Like a post once per client. Returns `false` when the marker set
    /// already holds the id or the post is gone. Likes are client-local
    /// counters; nothing is written remotely.
    pub fn like(&self, id: PostId) -> bool {
        {
            let mut state = self.state.lock().unwrap();
            if state.liked.contains(&id) {
                return false;
            }
            let Some(post) = state.feed.iter_mut().find(|p| p.id == id) else {
                return false;
            };
            post.likes += 1;
            state.liked.insert(id);
            self.mirror.save_feed(&state.feed);
            self.mirror.save_liked(&state.liked);
        }
        self.notify();
        true
    }

    // ── Replies ──

    /// Reply to a confirmed post. Provisional parents are rejected: their
    /// id must never leave the client as a foreign key.
    pub async fn reply(&self, id: PostId, body: &str) -> EngineResult<Reply> {
        let body = body.trim();
        if body.is_empty() {
            return Err(EngineError::EmptyBody);
        }
        let Some(post_id) = id.authoritative() else {
            return Err(EngineError::ReplyToPending);
        };
        let Some(remote) = self.remote.clone() else {
            return Err(EngineError::Offline);
        };

        let row = remote
            .insert_reply(&NewReply {
                post_id,
                username: self.alias.clone(),
                content: body.to_string(),
            })
            .await?;
        let reply = Reply::from(row);

        {
            let mut state = self.state.lock().unwrap();
            if let Some(post) = state.feed.iter_mut().find(|p| p.id == id) {
                if !post.replies.iter().any(|r| r.id == reply.id) {
                    post.replies.push(reply.clone());
                }
            }
            state.replied.insert(id);
            self.mirror.save_feed(&state.feed);
            self.mirror.save_replied(&state.replied);
        }
        self.notify();
        Ok(reply)
    }

    // ── Offline seeding ──

    /// Fill a quiet offline wall with a few muse-written confessions,
    /// de-duplicated by body. No-op when a remote is configured or the
    /// wall already has enough posts.
    pub async fn seed_offline(&self, muse_client: &dyn Muse) {
        if self.remote.is_some() || self.feed().len() >= SEED_THRESHOLD {
            return;
        }
        let seeds = muse::seed_confessions(muse_client).await;
        if seeds.is_empty() {
            return;
        }

        use rand::Rng;
        let mut rng = rand::thread_rng();
        let mut added = false;
        {
            let mut state = self.state.lock().unwrap();
            for body in seeds {
                if state.feed.iter().any(|p| p.body == body) {
                    continue;
                }
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                state.feed.insert(
                    0,
                    Post {
                        id: PostId::Provisional(seq),
                        author: crate::alias::generate_alias(),
                        prompt: lovewall_shared::FREEFORM_PROMPT.to_string(),
                        body,
                        created_at: Utc::now(),
                        likes: rng.gen_range(0..50),
                        status: PostStatus::Pending,
                        replies: Vec::new(),
                    },
                );
                added = true;
            }
            if added {
                state.feed.truncate(MAX_FEED_LEN);
                self.mirror.save_feed(&state.feed);
            }
        }
        if added {
            self.notify();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryStore;
    use lovewall_shared::FREEFORM_PROMPT;

    fn offline_wall() -> Arc<Wall> {
        Wall::open(&AppContext::in_memory())
    }

    fn online_wall() -> (Arc<Wall>, Arc<MemoryStore>, AppContext) {
        let store = Arc::new(MemoryStore::new());
        let ctx = AppContext::with_store(store.clone());
        let wall = Wall::open(&ctx);
        (wall, store, ctx)
    }

    async fn settle(wall: &Arc<Wall>) {
        // Let spawned reconcilers run.
        for _ in 0..20 {
            tokio::task::yield_now().await;
            if wall.feed().iter().all(|p| p.status != PostStatus::Pending) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn row(id: i64, author: &str, body: &str, likes: i64) -> ResponseRow {
        ResponseRow {
            id,
            username: author.to_string(),
            question: FREEFORM_PROMPT.to_string(),
            answer: body.to_string(),
            created_at: Utc::now(),
            likes: Some(likes),
        }
    }

    // Empty offline wall, one submission, mirror reload reproduces the
    // same single-entry feed.
    #[tokio::test]
    async fn offline_submit_survives_reload() {
        let ctx = AppContext::in_memory();
        let wall = Wall::open(&ctx);
        wall.submit_post(FREEFORM_PROMPT, "Test message").unwrap();

        let feed = wall.feed();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].prompt, FREEFORM_PROMPT);
        assert_eq!(feed[0].body, "Test message");
        assert_eq!(feed[0].likes, 0);
        assert!(feed[0].id.is_provisional());

        // Same storage, fresh wall: the mirror is the whole data source.
        let reloaded = Wall::open(&ctx);
        assert_eq!(reloaded.feed(), feed);
        assert_eq!(reloaded.alias(), wall.alias());
    }

    #[tokio::test]
    async fn empty_body_is_rejected() {
        let wall = offline_wall();
        assert!(matches!(
            wall.submit_post(FREEFORM_PROMPT, "   "),
            Err(EngineError::EmptyBody)
        ));
        assert!(wall.feed().is_empty());
    }

    #[tokio::test]
    async fn submission_reconciles_to_the_authoritative_id() {
        let (wall, _store, _ctx) = online_wall();
        let provisional = wall.submit_post(FREEFORM_PROMPT, "hello").unwrap();
        assert!(provisional.id.is_provisional());

        settle(&wall).await;
        let feed = wall.feed();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].status, PostStatus::Confirmed);
        assert!(feed[0].id.authoritative().is_some());
        assert_eq!(feed[0].body, "hello");
    }

    #[tokio::test]
    async fn reconcile_twice_confirms_exactly_once() {
        let (wall, store, _ctx) = online_wall();
        let post = wall.submit_post(FREEFORM_PROMPT, "once").unwrap();
        let PostId::Provisional(seq) = post.id else {
            panic!("expected provisional id");
        };
        settle(&wall).await;
        // Second invocation for the same seq: no-op.
        wall.reconcile(seq).await;

        let feed = wall.feed();
        assert_eq!(feed.len(), 1);
        assert_eq!(store.recent_responses(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn live_insert_with_known_id_is_discarded() {
        let wall = offline_wall();
        wall.apply_live_event(LiveEvent::PostInserted(row(42, "Romeo9", "hi", 0)));
        wall.apply_live_event(LiveEvent::PostInserted(row(42, "Romeo9", "hi", 0)));
        assert_eq!(wall.feed().len(), 1);
    }

    #[tokio::test]
    async fn live_echo_of_own_pending_post_is_discarded() {
        let (wall, _store, _ctx) = online_wall();
        let post = wall.submit_post(FREEFORM_PROMPT, "mine").unwrap();
        // Echo arrives before the reconciler finishes.
        wall.apply_live_event(LiveEvent::PostInserted(row(
            7,
            &post.author,
            "mine",
            0,
        )));
        settle(&wall).await;
        assert_eq!(wall.feed().len(), 1);
    }

    // A like-count update changes the entry in place; no new entry,
    // length unchanged.
    #[tokio::test]
    async fn live_update_merges_likes_in_place() {
        let wall = offline_wall();
        wall.apply_live_event(LiveEvent::PostInserted(row(42, "Juliet3", "hey", 1)));
        let before = wall.feed();
        assert_eq!(before[0].likes, 1);

        wall.apply_live_event(LiveEvent::PostUpdated(row(42, "Juliet3", "hey", 2)));
        let after = wall.feed();
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0].id, PostId::Authoritative(42));
        assert_eq!(after[0].likes, 2);
    }

    #[tokio::test]
    async fn update_outside_the_window_is_discarded() {
        let wall = offline_wall();
        wall.apply_live_event(LiveEvent::PostUpdated(row(99, "Ghost1", "gone", 5)));
        assert!(wall.feed().is_empty());
    }

    #[tokio::test]
    async fn feed_never_exceeds_the_cap() {
        let wall = offline_wall();
        for i in 0..(MAX_FEED_LEN as i64 + 20) {
            wall.apply_live_event(LiveEvent::PostInserted(row(
                i,
                "Starlight8",
                &format!("post {i}"),
                0,
            )));
        }
        let feed = wall.feed();
        assert_eq!(feed.len(), MAX_FEED_LEN);
        // Newest first; the oldest ids fell off the end.
        assert_eq!(feed[0].id, PostId::Authoritative(MAX_FEED_LEN as i64 + 19));
        assert_eq!(feed.last().unwrap().id, PostId::Authoritative(20));
    }

    #[tokio::test]
    async fn second_like_from_the_same_client_is_a_no_op() {
        let wall = offline_wall();
        wall.apply_live_event(LiveEvent::PostInserted(row(1, "Honey5", "like me", 0)));
        assert!(wall.like(PostId::Authoritative(1)));
        assert!(!wall.like(PostId::Authoritative(1)));
        assert_eq!(wall.feed()[0].likes, 1);
        assert!(wall.has_liked(PostId::Authoritative(1)));
    }

    #[tokio::test]
    async fn like_marker_survives_reload() {
        let ctx = AppContext::in_memory();
        let wall = Wall::open(&ctx);
        wall.apply_live_event(LiveEvent::PostInserted(row(1, "Honey5", "like me", 0)));
        assert!(wall.like(PostId::Authoritative(1)));

        let reloaded = Wall::open(&ctx);
        assert!(!reloaded.like(PostId::Authoritative(1)));
        assert_eq!(reloaded.feed()[0].likes, 1);
    }

    #[tokio::test]
    async fn like_on_a_pending_post_follows_it_through_confirmation() {
        let (wall, _store, _ctx) = online_wall();
        let post = wall.submit_post(FREEFORM_PROMPT, "pre-like").unwrap();
        assert!(wall.like(post.id));
        settle(&wall).await;

        let confirmed = &wall.feed()[0];
        assert_eq!(confirmed.status, PostStatus::Confirmed);
        assert_eq!(confirmed.likes, 1);
        assert!(wall.has_liked(confirmed.id));
        assert!(!wall.like(confirmed.id));
    }

    #[tokio::test]
    async fn reply_to_a_provisional_post_is_rejected() {
        let (wall, _store, _ctx) = online_wall();
        let post = wall.submit_post(FREEFORM_PROMPT, "no replies yet").unwrap();
        let err = wall.reply(post.id, "too soon").await.unwrap_err();
        assert!(matches!(err, EngineError::ReplyToPending));
    }

    #[tokio::test]
    async fn reply_lands_on_the_confirmed_parent() {
        let (wall, _store, _ctx) = online_wall();
        wall.submit_post(FREEFORM_PROMPT, "parent").unwrap();
        settle(&wall).await;
        let id = wall.feed()[0].id;

        let reply = wall.reply(id, "so true").await.unwrap();
        assert_eq!(reply.post_id, id.authoritative().unwrap());
        let feed = wall.feed();
        assert_eq!(feed[0].replies.len(), 1);
        assert!(wall.has_replied(id));

        // A live echo of the same reply row must not duplicate it.
        wall.apply_live_event(LiveEvent::ReplyInserted(lovewall_shared::ReplyRow {
            id: reply.id,
            post_id: reply.post_id,
            username: reply.author.clone(),
            content: reply.body.clone(),
            created_at: reply.created_at,
        }));
        assert_eq!(wall.feed()[0].replies.len(), 1);
    }

    #[tokio::test]
    async fn offline_reply_is_an_error() {
        let wall = offline_wall();
        wall.apply_live_event(LiveEvent::PostInserted(row(1, "Petal2", "hi", 0)));
        let err = wall.reply(PostId::Authoritative(1), "hello").await.unwrap_err();
        assert!(matches!(err, EngineError::Offline));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_mark_the_post_failed_and_retry_recovers() {
        let (wall, store, _ctx) = online_wall();
        store.set_fail_inserts(true);
        let post = wall.submit_post(FREEFORM_PROMPT, "flaky").unwrap();

        // Paused time: sleep() in the backoff auto-advances.
        for _ in 0..200 {
            tokio::task::yield_now().await;
            if wall.feed()[0].status == PostStatus::Failed {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(wall.feed()[0].status, PostStatus::Failed);
        assert!(wall.feed()[0].id.is_provisional());

        store.set_fail_inserts(false);
        wall.retry_post(post.id).unwrap();
        settle(&wall).await;
        let feed = wall.feed();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].status, PostStatus::Confirmed);
    }

    #[tokio::test]
    async fn refresh_replaces_the_window_but_keeps_provisional_entries() {
        let (wall, store, _ctx) = online_wall();
        store.set_fail_inserts(true);
        store.push_response("Cupid7", FREEFORM_PROMPT, "from another client");

        let local = wall.submit_post(FREEFORM_PROMPT, "still local").unwrap();
        wall.refresh().await.unwrap();

        let feed = wall.feed();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].id, local.id);
        assert_eq!(feed[1].body, "from another client");
    }
}
