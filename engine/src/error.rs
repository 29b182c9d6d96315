use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("post body is empty")]
    EmptyBody,

    /// Replies are keyed by the parent's remote row id; a provisional id
    /// must never leave the client as a foreign key.
    #[error("cannot reply to a post that has not been confirmed yet")]
    ReplyToPending,

    #[error("no remote store configured")]
    Offline,

    #[error("post not found: {0}")]
    PostNotFound(String),

    #[error("remote store rejected the request: {0}")]
    RemoteRejected(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
