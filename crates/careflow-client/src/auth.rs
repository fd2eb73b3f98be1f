//! Session state: the bearer token and the user it belongs to.
//!
//! ```text
//! TokenStore (file / memory) ──restore──> AuthState ──token──> ApiClient
//!        ^                                   │
//!        └─────────── save / clear ──────────┘
//! ```
//!
//! `AuthState` is cheap to clone; clones share one session behind an async
//! `RwLock`. The last completed write wins.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::schema::User;

/// Persistence for the bearer token between runs.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> ApiResult<Option<String>>;
    async fn save(&self, token: &str) -> ApiResult<()>;
    async fn clear(&self) -> ApiResult<()>;
}

/// Token kept in a plain file, one token per file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn store_err(&self, e: std::io::Error) -> ApiError {
        ApiError::TokenStore(format!("{}: {e}", self.path.display()))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> ApiResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.store_err(e)),
        }
    }

    async fn save(&self, token: &str) -> ApiResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.store_err(e))?;
        }
        tokio::fs::write(&self.path, token)
            .await
            .map_err(|e| self.store_err(e))
    }

    async fn clear(&self) -> ApiResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.store_err(e)),
        }
    }
}

/// In-process store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> ApiResult<Option<String>> {
        Ok(self.token.lock().await.clone())
    }

    async fn save(&self, token: &str) -> ApiResult<()> {
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> ApiResult<()> {
        *self.token.lock().await = None;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Session {
    token: Option<String>,
    user: Option<User>,
}

#[derive(Clone)]
pub struct AuthState {
    session: Arc<RwLock<Session>>,
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState").finish_non_exhaustive()
    }
}

impl AuthState {
    /// Empty session backed by `store`.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::default())),
            store,
        }
    }

    /// Session seeded with whatever token `store` holds. The token is not
    /// checked against the server here; see `ApiClient::restore_session`.
    pub async fn restore(store: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let token = store.load().await?;
        debug!(has_token = token.is_some(), "restored token from store");
        Ok(Self {
            session: Arc::new(RwLock::new(Session { token, user: None })),
            store,
        })
    }

    pub async fn token(&self) -> Option<String> {
        self.session.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.token.is_some()
    }

    /// Record a fresh login and persist its token.
    pub async fn set_session(&self, token: String, user: User) -> ApiResult<()> {
        self.store.save(&token).await?;
        let mut session = self.session.write().await;
        session.token = Some(token);
        session.user = Some(user);
        Ok(())
    }

    pub async fn set_user(&self, user: User) {
        self.session.write().await.user = Some(user);
    }

    /// Drop the in-memory session first, then the persisted token.
    pub async fn clear(&self) -> ApiResult<()> {
        {
            let mut session = self.session.write().await;
            session.token = None;
            session.user = None;
        }
        self.store.clear().await
    }
}
