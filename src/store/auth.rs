use std::fmt::Debug;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{Storable, Store};
use crate::config::AUTH_STORE_PATH;
use crate::impl_store;

/// On-disk shape of the credential file.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Auth {
    pub token: Option<String>,
}

impl Storable for Auth {
    fn path() -> Result<PathBuf> {
        let path = dirs::home_dir()
            .context("Could not find `home` directory")?
            .join(AUTH_STORE_PATH);

        log::debug!("Auth store path: {:?}", path);

        Ok(path)
    }
}

impl_store!(Auth);

/// Holder of the single bearer credential used by every request.
///
/// Reads are served from memory, writes go through to whatever backs the
/// store. There is no expiry tracking, the server decides whether a token
/// is still valid.
#[async_trait]
pub trait TokenStore: Debug + Send + Sync {
    fn get(&self) -> Option<String>;
    async fn set(&self, token: String) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// Token store persisted to `~/.rival/auth.json`.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    auth: Mutex<Auth>,
}

impl FileTokenStore {
    pub async fn load() -> Result<Self> {
        Self::open(Auth::path()?).await
    }

    /// Opens the store at `path`. An unreadable file is replaced by an empty
    /// store, which only means nobody is signed in.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let auth = match Auth::load_from(&path).await {
            Ok(auth) => auth,
            Err(error) => {
                log::warn!("Ignoring stored credentials: {error:#}");

                if let Err(error) = Auth::default().save_to(&path).await {
                    log::debug!("Could not reset {}: {error:#}", path.display());
                }

                Auth::default()
            }
        };

        Ok(Self {
            path,
            auth: Mutex::new(auth),
        })
    }

    /// Persists `token` first and only then adopts it, so memory never holds
    /// a credential the file doesn't. The lock is not held across the write.
    async fn write(&self, token: Option<String>) -> Result<()> {
        if self.auth.lock().token == token {
            return Ok(());
        }

        let snapshot = Auth { token };

        snapshot.save_to(&self.path).await?;

        *self.auth.lock() = snapshot;

        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        self.auth.lock().token.clone()
    }

    async fn set(&self, token: String) -> Result<()> {
        self.write(Some(token)).await
    }

    async fn clear(&self) -> Result<()> {
        self.write(None).await
    }
}

/// Token store that lives only as long as the process, used for tokens
/// passed through the environment.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().clone()
    }

    async fn set(&self, token: String) -> Result<()> {
        *self.token.lock() = Some(token);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.token.lock().take();
        Ok(())
    }
}
