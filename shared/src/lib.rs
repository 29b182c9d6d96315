use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Identity ──

/// A feed entry id. Locally-created posts carry a provisional sequence
/// number until the remote store assigns the real row id; the two
/// namespaces can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostId {
    Provisional(u64),
    Authoritative(i64),
}

impl PostId {
    pub fn is_provisional(&self) -> bool {
        matches!(self, PostId::Provisional(_))
    }

    /// The remote row id, if this entry has been confirmed.
    pub fn authoritative(&self) -> Option<i64> {
        match self {
            PostId::Authoritative(id) => Some(*id),
            PostId::Provisional(_) => None,
        }
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostId::Provisional(seq) => write!(f, "local-{seq}"),
            PostId::Authoritative(id) => write!(f, "{id}"),
        }
    }
}

/// Client-side lifecycle of a post. `Pending -> Confirmed` on reconcile
/// success, `Pending -> Failed` once retries are exhausted; `Failed` posts
/// can be re-armed. There is no deleted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostStatus {
    Pending,
    Confirmed,
    Failed,
}

// ── Feed ──

/// Prompt value marking a free-form confession rather than an answer to a
/// daily prompt.
pub const FREEFORM_PROMPT: &str = "Confession";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: String,
    pub prompt: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub likes: u32,
    pub status: PostStatus,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: i64,
    pub post_id: i64,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// ── Wire rows (remote store schema) ──

/// One row of the remote `responses` table. `likes` is optional: some
/// store deployments never added the column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRow {
    pub id: i64,
    pub username: String,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: Option<i64>,
}

/// Insert payload for `responses` — server-assigned columns omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewResponse {
    pub username: String,
    pub question: String,
    pub answer: String,
}

/// One row of the remote `replies` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyRow {
    pub id: i64,
    pub post_id: i64,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `replies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReply {
    pub post_id: i64,
    pub username: String,
    pub content: String,
}

impl From<ResponseRow> for Post {
    fn from(row: ResponseRow) -> Self {
        Post {
            id: PostId::Authoritative(row.id),
            author: row.username,
            prompt: row.question,
            body: row.answer,
            created_at: row.created_at,
            likes: row.likes.unwrap_or(0).max(0) as u32,
            status: PostStatus::Confirmed,
            replies: Vec::new(),
        }
    }
}

impl From<ReplyRow> for Reply {
    fn from(row: ReplyRow) -> Self {
        Reply {
            id: row.id,
            post_id: row.post_id,
            author: row.username,
            body: row.content,
            created_at: row.created_at,
        }
    }
}

// ── Live events ──

/// A push notification from the remote store's subscription channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiveEvent {
    PostInserted(ResponseRow),
    PostUpdated(ResponseRow),
    ReplyInserted(ReplyRow),
}

// ── Themes ──

/// Available skins. Presentation only — a theme never changes behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Rose,
    Midnight,
    Retro,
    Noir,
}

impl Theme {
    pub fn parse(s: &str) -> Option<Theme> {
        match s.to_lowercase().as_str() {
            "rose" => Some(Theme::Rose),
            "midnight" => Some(Theme::Midnight),
            "retro" => Some(Theme::Retro),
            "noir" => Some(Theme::Noir),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Rose => "rose",
            Theme::Midnight => "midnight",
            Theme::Retro => "retro",
            Theme::Noir => "noir",
        }
    }

    pub const ALL: [Theme; 4] = [Theme::Rose, Theme::Midnight, Theme::Retro, Theme::Noir];
}

/// Presentation tokens for one theme, looked up once per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeTokens {
    pub heart: &'static str,
    pub accent: &'static str,
    pub muted: &'static str,
    pub banner: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisional_ids_never_expose_a_row_id() {
        assert_eq!(PostId::Provisional(7).authoritative(), None);
        assert_eq!(PostId::Authoritative(42).authoritative(), Some(42));
    }

    #[test]
    fn post_id_display_keeps_namespaces_apart() {
        assert_eq!(PostId::Provisional(3).to_string(), "local-3");
        assert_eq!(PostId::Authoritative(3).to_string(), "3");
    }

    #[test]
    fn row_without_likes_column_maps_to_zero() {
        let row = ResponseRow {
            id: 1,
            username: "Cupid12".into(),
            question: FREEFORM_PROMPT.into(),
            answer: "hello".into(),
            created_at: Utc::now(),
            likes: None,
        };
        let post: Post = row.into();
        assert_eq!(post.likes, 0);
        assert_eq!(post.status, PostStatus::Confirmed);
    }

    #[test]
    fn theme_parse_round_trips_names() {
        for t in Theme::ALL {
            assert_eq!(Theme::parse(t.name()), Some(t));
        }
        assert_eq!(Theme::parse("disco"), None);
    }
}
