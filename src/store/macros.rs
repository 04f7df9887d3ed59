/// Implements [`Store`](crate::store::Store) for JSON backed types.
#[macro_export]
macro_rules! impl_store {
    ($($name:ty),+ $(,)?) => ($(
        #[async_trait::async_trait]
        impl $crate::store::Store for $name {
            async fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
                use anyhow::Context as _;

                // first run, start from an empty store on disk
                if tokio::fs::metadata(path).await.is_err() {
                    log::debug!("Creating store at {}", path.display());
                    return Self::default().save_to(path).await;
                }

                let buffer = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Error reading {}", path.display()))?;

                serde_json::from_str(&buffer)
                    .with_context(|| format!("Failed to deserialize {}", path.display()))
            }

            async fn save_to(&self, path: &std::path::Path) -> anyhow::Result<Self> {
                use anyhow::Context as _;

                tokio::fs::create_dir_all(path.parent().context("Failed to get store directory")?)
                    .await
                    .context("Failed to create store directory")?;

                let contents = serde_json::to_vec_pretty(&self).context("Failed to serialize")?;

                tokio::fs::write(path, contents)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;

                Ok(self.clone())
            }
        }
    )+)
}
