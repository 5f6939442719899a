use anyhow::Result;
use async_trait::async_trait;

/// Storage for uploaded and generated media files (photos, identity images).
/// Keys are relative paths such as `identity_codes/identity_<chip>.png`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store content under key, replacing any existing object
    async fn upload(&self, key: &str, content: bytes::Bytes) -> Result<()>;

    /// Remove an object; missing objects are not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Site-relative URL under which the object is served
    fn url(&self, key: &str) -> String;
}
