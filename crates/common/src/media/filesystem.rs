use crate::media::MediaStore;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Media store backed by a local directory that is served under `url_prefix`
#[derive(Debug, Clone)]
pub struct FilesystemMediaStore {
    root: PathBuf,
    url_prefix: String,
}

impl FilesystemMediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        let trimmed = url_prefix.trim_matches('/');
        let url_prefix = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        };
        Self {
            root: root.into(),
            url_prefix,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a key inside the root, rejecting absolute paths and `..`
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            bail!("invalid media key: {:?}", key);
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn upload(&self, key: &str, content: bytes::Bytes) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create media directory {:?}", parent))?;
        }

        // Write then rename so readers never observe a partial file.
        // One temporary file per call; concurrent writers race on the rename only.
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("invalid media key: {:?}", key))?;
        let tmp = path.with_file_name(format!(".{}.{}.part", file_name, xid::new()));
        tokio::fs::write(&tmp, &content)
            .await
            .with_context(|| format!("failed to write media object {}", key))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("failed to finalize media object {}", key));
        }

        debug!(key = %key, size = content.len(), "stored media object");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = %key, "deleted media object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to delete media object {}", key)),
        }
    }

    fn url(&self, key: &str) -> String {
        format!("{}{}", self.url_prefix, key.trim_start_matches('/'))
    }
}
