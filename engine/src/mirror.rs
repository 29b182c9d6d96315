//! Local mirror of the feed and the handful of per-client values the app
//! persists. Reads fail soft: a missing or corrupt payload is an empty
//! value, never an error surfaced to the caller.

use std::collections::HashSet;
use std::sync::Arc;

use lovewall_shared::{Post, PostId, Theme};
use tracing::debug;

use crate::storage::Storage;

// Persisted keys, one per client-local value.
const KEY_FEED: &str = "lovewall.feed";
const KEY_LIKED: &str = "lovewall.liked";
const KEY_REPLIED: &str = "lovewall.replied";
const KEY_ALIAS: &str = "lovewall.alias";
const KEY_ACCEPTED: &str = "lovewall.accepted";
const KEY_REACTION: &str = "lovewall.reaction";
const KEY_THEME: &str = "lovewall.theme";

#[derive(Clone)]
pub struct Mirror {
    storage: Arc<dyn Storage>,
}

impl Mirror {
    pub fn new(storage: Arc<dyn Storage>) -> Mirror {
        Mirror { storage }
    }

    // ── Feed ──

    pub fn load_feed(&self) -> Vec<Post> {
        let Some(raw) = self.storage.get(KEY_FEED) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(feed) => feed,
            Err(e) => {
                debug!(error = %e, "discarding corrupt mirrored feed");
                Vec::new()
            }
        }
    }

    pub fn save_feed(&self, feed: &[Post]) {
        if let Ok(raw) = serde_json::to_string(feed) {
            self.storage.set(KEY_FEED, &raw);
        }
    }

    // ── Interaction markers ──

    pub fn load_liked(&self) -> HashSet<PostId> {
        self.load_id_set(KEY_LIKED)
    }

    pub fn save_liked(&self, liked: &HashSet<PostId>) {
        self.save_id_set(KEY_LIKED, liked);
    }

    pub fn load_replied(&self) -> HashSet<PostId> {
        self.load_id_set(KEY_REPLIED)
    }

    pub fn save_replied(&self, replied: &HashSet<PostId>) {
        self.save_id_set(KEY_REPLIED, replied);
    }

    fn load_id_set(&self, key: &str) -> HashSet<PostId> {
        self.storage
            .get(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn save_id_set(&self, key: &str, set: &HashSet<PostId>) {
        if let Ok(raw) = serde_json::to_string(set) {
            self.storage.set(key, &raw);
        }
    }

    // ── Per-client strings & flags ──

    pub fn alias(&self) -> Option<String> {
        self.storage.get(KEY_ALIAS).filter(|a| !a.is_empty())
    }

    pub fn save_alias(&self, alias: &str) {
        self.storage.set(KEY_ALIAS, alias);
    }

    pub fn accepted(&self) -> bool {
        self.storage.get(KEY_ACCEPTED).as_deref() == Some("true")
    }

    pub fn set_accepted(&self, accepted: bool) {
        self.storage.set(KEY_ACCEPTED, if accepted { "true" } else { "false" });
    }

    pub fn cached_reaction(&self) -> Option<String> {
        self.storage.get(KEY_REACTION).filter(|r| !r.is_empty())
    }

    pub fn save_reaction(&self, reaction: &str) {
        self.storage.set(KEY_REACTION, reaction);
    }

    pub fn theme(&self) -> Theme {
        self.storage
            .get(KEY_THEME)
            .and_then(|raw| Theme::parse(&raw))
            .unwrap_or_default()
    }

    pub fn save_theme(&self, theme: Theme) {
        self.storage.set(KEY_THEME, theme.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::Utc;
    use lovewall_shared::{PostStatus, FREEFORM_PROMPT};

    fn mirror() -> Mirror {
        Mirror::new(Arc::new(MemoryStorage::new()))
    }

    fn post(seq: u64, body: &str) -> Post {
        Post {
            id: PostId::Provisional(seq),
            author: "Dreamer42".into(),
            prompt: FREEFORM_PROMPT.into(),
            body: body.into(),
            created_at: Utc::now(),
            likes: 0,
            status: PostStatus::Pending,
            replies: Vec::new(),
        }
    }

    #[test]
    fn absent_feed_loads_empty() {
        assert!(mirror().load_feed().is_empty());
    }

    #[test]
    fn corrupt_feed_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(KEY_FEED, "{not json");
        let m = Mirror::new(storage);
        assert!(m.load_feed().is_empty());
    }

    #[test]
    fn feed_round_trips_including_provisional_entries() {
        let m = mirror();
        let feed = vec![post(1, "hello"), post(2, "world")];
        m.save_feed(&feed);
        assert_eq!(m.load_feed(), feed);
    }

    #[test]
    fn liked_set_round_trips() {
        let m = mirror();
        let mut liked = HashSet::new();
        liked.insert(PostId::Authoritative(42));
        liked.insert(PostId::Provisional(1));
        m.save_liked(&liked);
        assert_eq!(m.load_liked(), liked);
    }

    #[test]
    fn accepted_flag_defaults_to_false() {
        let m = mirror();
        assert!(!m.accepted());
        m.set_accepted(true);
        assert!(m.accepted());
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(KEY_THEME, "glitter");
        let m = Mirror::new(storage);
        assert_eq!(m.theme(), Theme::default());
    }
}
