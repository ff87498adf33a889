//! Content resolver port (driven/secondary port)
//!
//! Turns an opaque [`ContentRef`] into a byte stream the staging service can
//! copy into scratch storage. Uses `anyhow::Result` because resolution
//! failures are adapter-specific (missing files, revoked grants, unsupported
//! schemes).

use std::pin::Pin;

use tokio::io::AsyncRead;

use crate::domain::newtypes::ContentRef;

/// Boxed async reader returned by resolvers
pub type ContentReader = Pin<Box<dyn AsyncRead + Send>>;

/// Port trait for opening user-selected content
#[async_trait::async_trait]
pub trait IContentResolver: Send + Sync {
    /// Opens the referenced content for reading
    async fn open(&self, content: &ContentRef) -> anyhow::Result<ContentReader>;
}
