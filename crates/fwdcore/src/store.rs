//! Persisted store: one JSON document with five named collections.
//!
//! The only persistence primitives are a full `load` and a full `save`.
//! Callers serialize read-modify-write sequences themselves (see
//! [`crate::approval::Gatekeeper`]).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;

use crate::error::{PersistenceError, StoreResult};
use crate::types::{ActorId, Profile};

/// The whole persisted document.
///
/// `channels`, `groups` and `forwarding` belong to the forwarding feature and
/// are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub users: BTreeMap<String, Profile>,
    #[serde(default)]
    pub pending_users: BTreeMap<String, Profile>,
    #[serde(default)]
    pub channels: Map<String, Value>,
    #[serde(default)]
    pub groups: Map<String, Value>,
    #[serde(default)]
    pub forwarding: Map<String, Value>,
}

impl StoreState {
    pub fn member(&self, actor: ActorId) -> Option<&Profile> {
        self.users.get(&actor.key())
    }

    pub fn pending(&self, actor: ActorId) -> Option<&Profile> {
        self.pending_users.get(&actor.key())
    }

    pub fn is_member(&self, actor: ActorId) -> bool {
        self.member(actor).is_some()
    }

    pub fn is_pending(&self, actor: ActorId) -> bool {
        self.pending(actor).is_some()
    }

    /// Pending requests in id order, skipping keys that are not valid ids.
    pub fn pending_requests(&self) -> Vec<(ActorId, &Profile)> {
        self.pending_users
            .iter()
            .filter_map(|(key, profile)| key.parse::<ActorId>().ok().map(|id| (id, profile)))
            .collect()
    }
}

/// Full-document persistence backend.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the persisted state, creating and persisting the empty default
    /// when no document exists yet.
    async fn load(&self) -> StoreResult<StoreState>;

    /// Replaces the persisted state. On error nothing was replaced.
    async fn save(&self, state: &StoreState) -> StoreResult<()>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn load(&self) -> StoreResult<StoreState> {
        (**self).load().await
    }

    async fn save(&self, state: &StoreState) -> StoreResult<()> {
        (**self).save(state).await
    }
}

/// Store backed by a JSON file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the document is staged in before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "store.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load(&self) -> StoreResult<StoreState> {
        match fs_err::tokio::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Store {} not found, creating an empty one", self.path.display());
                let state = StoreState::default();
                self.save(&state).await?;
                Ok(state)
            }
            Err(e) => Err(PersistenceError::Io(e)),
        }
    }

    async fn save(&self, state: &StoreState) -> StoreResult<()> {
        let body = serde_json::to_vec_pretty(state)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::tokio::create_dir_all(parent).await?;
        }

        let staging = self.staging_path();
        let mut file = fs_err::tokio::File::create(&staging).await?;
        file.write_all(&body).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs_err::tokio::rename(&staging, &self.path).await {
            let _ = fs_err::tokio::remove_file(&staging).await;
            return Err(e.into());
        }

        Ok(())
    }
}

/// In-process store.
///
/// Starts without a document, like a fresh `JsonFileStore`. Saves can be made
/// to fail to exercise the all-or-nothing paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<StoreState>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `state`.
    pub fn with_state(state: StoreState) -> Self {
        Self {
            document: Mutex::new(Some(state)),
            ..Self::default()
        }
    }

    /// Makes every following `save` fail with an I/O error.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Current document without the default-initialization side effect.
    pub fn peek(&self) -> Option<StoreState> {
        self.document.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> StoreResult<StoreState> {
        if let Some(state) = self.peek() {
            return Ok(state);
        }
        let state = StoreState::default();
        self.save(&state).await?;
        Ok(state)
    }

    async fn save(&self, state: &StoreState) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Io(std::io::Error::other("memory store is read-only")));
        }
        *self.document.lock().unwrap_or_else(|e| e.into_inner()) = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
