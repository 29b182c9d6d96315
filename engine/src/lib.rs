//! lovewall-engine: an optimistic confession-wall sync engine.
//!
//! The feed is updated locally first (provisional entries), reconciled
//! against a remote CRUD store in the background, merged with live events
//! from other clients, and mirrored to local key-value storage for warm
//! starts and a pure offline mode.

pub mod alias;
pub mod config;
pub mod context;
pub mod error;
pub mod live;
pub mod mirror;
pub mod muse;
pub mod prompts;
pub mod remote;
pub mod storage;
pub mod theme;
pub mod wall;

pub use config::Config;
pub use context::AppContext;
pub use error::{EngineError, EngineResult};
pub use wall::{Wall, MAX_FEED_LEN};
