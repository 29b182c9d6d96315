//! Explicit wiring for everything with an external edge. Built once at
//! startup and passed down; components never reach for ambient globals,
//! so tests substitute in-memory collaborators freely.

use std::sync::Arc;

use crate::config::Config;
use crate::error::EngineResult;
use crate::mirror::Mirror;
use crate::muse::{GeminiMuse, Muse};
use crate::remote::{HttpStore, MemoryStore, RemoteStore};
use crate::storage::{DirStorage, MemoryStorage, Storage};

pub struct AppContext {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub remote: Option<Arc<dyn RemoteStore>>,
    pub muse: Option<Arc<dyn Muse>>,
}

impl AppContext {
    /// Wire the real collaborators from configuration. Missing store
    /// credentials select offline mode rather than failing.
    pub fn from_config(config: Config) -> EngineResult<AppContext> {
        let storage: Arc<dyn Storage> = Arc::new(DirStorage::new(config.data_dir.clone()));
        let remote = match &config.remote {
            Some(rc) => Some(Arc::new(HttpStore::new(rc)?) as Arc<dyn RemoteStore>),
            None => None,
        };
        let muse = config
            .muse_api_key
            .clone()
            .map(|key| Arc::new(GeminiMuse::new(key)) as Arc<dyn Muse>);
        Ok(AppContext {
            config,
            storage,
            remote,
            muse,
        })
    }

    /// Offline context over in-memory storage.
    pub fn in_memory() -> AppContext {
        AppContext {
            config: Config {
                remote: None,
                muse_api_key: None,
                data_dir: std::path::PathBuf::new(),
            },
            storage: Arc::new(MemoryStorage::new()),
            remote: None,
            muse: None,
        }
    }

    /// In-memory storage talking to the given fake store.
    pub fn with_store(store: Arc<MemoryStore>) -> AppContext {
        let mut ctx = AppContext::in_memory();
        ctx.remote = Some(store as Arc<dyn RemoteStore>);
        ctx
    }

    pub fn mirror(&self) -> Mirror {
        Mirror::new(self.storage.clone())
    }
}
