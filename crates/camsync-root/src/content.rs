//! Local content resolver (secondary/driven adapter)
//!
//! Implements [`IContentResolver`] for content that lives on the local
//! filesystem. Accepts `file://` URIs and absolute paths; any other scheme is
//! rejected as unsupported.

use std::io::ErrorKind;
use std::path::PathBuf;

use camsync_core::domain::errors::StagingError;
use camsync_core::domain::newtypes::ContentRef;
use camsync_core::ports::content_resolver::{ContentReader, IContentResolver};
use tracing::{debug, instrument};
use url::Url;

/// Opens local files referenced by path or `file://` URI
#[derive(Debug, Clone, Default)]
pub struct LocalContentResolver;

impl LocalContentResolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Maps a locator to a local path
    pub fn local_path(content: &ContentRef) -> Result<PathBuf, StagingError> {
        let locator = content.as_str();
        if locator.starts_with('/') {
            return Ok(PathBuf::from(locator));
        }
        let url = Url::parse(locator)
            .map_err(|_| StagingError::UnsupportedLocator(locator.to_string()))?;
        if url.scheme() != "file" {
            return Err(StagingError::UnsupportedLocator(locator.to_string()));
        }
        url.to_file_path()
            .map_err(|()| StagingError::UnsupportedLocator(locator.to_string()))
    }
}

#[async_trait::async_trait]
impl IContentResolver for LocalContentResolver {
    #[instrument(skip(self, content), fields(content = %content))]
    async fn open(&self, content: &ContentRef) -> anyhow::Result<ContentReader> {
        let path = Self::local_path(content)?;
        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StagingError::MissingSource(path.display().to_string()).into())
            }
            Err(e) => return Err(StagingError::Io(e).into()),
        };
        debug!(path = %path.display(), "Opened local content");
        Ok(Box::pin(file))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    use super::*;

    fn content(locator: &str) -> ContentRef {
        ContentRef::new(locator).unwrap()
    }

    #[test]
    fn test_local_path_accepts_absolute_path() {
        let path = LocalContentResolver::local_path(&content("/sdcard/clip.mp4")).unwrap();
        assert_eq!(path, PathBuf::from("/sdcard/clip.mp4"));
    }

    #[test]
    fn test_local_path_decodes_file_uri() {
        let path =
            LocalContentResolver::local_path(&content("file:///sdcard/my%20clip.mp4")).unwrap();
        assert_eq!(path, PathBuf::from("/sdcard/my clip.mp4"));
    }

    #[test]
    fn test_local_path_rejects_other_schemes() {
        let err =
            LocalContentResolver::local_path(&content("content://media/external/video/42"))
                .unwrap_err();
        assert!(matches!(err, StagingError::UnsupportedLocator(_)));

        let err = LocalContentResolver::local_path(&content("relative/clip.mp4")).unwrap_err();
        assert!(matches!(err, StagingError::UnsupportedLocator(_)));
    }

    #[tokio::test]
    async fn test_open_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        tokio::fs::write(&path, b"frames").await.unwrap();

        let mut reader = LocalContentResolver::new()
            .open(&content(path.to_str().unwrap()))
            .await
            .unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"frames");
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let err = LocalContentResolver::new()
            .open(&content("/nonexistent/camsync/clip.mp4"))
            .await
            .err()
            .expect("expected open to fail");
        assert!(matches!(
            err.downcast_ref::<StagingError>(),
            Some(StagingError::MissingSource(_))
        ));
    }
}
