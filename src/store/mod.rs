use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

pub mod auth;
pub mod macros;

pub trait Storable<T: Serialize + DeserializeOwned + Default + Clone = Self> {
    /// Default location of the store.
    fn path() -> Result<PathBuf>;
}

#[async_trait]
pub trait Store<T: Storable + Serialize + DeserializeOwned + Default + Clone = Self> {
    /// Reads the store at `path`, creating an empty one if it doesn't exist.
    async fn load_from(path: &Path) -> Result<T>;
    async fn save_to(&self, path: &Path) -> Result<T>;
}
