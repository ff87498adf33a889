//! Media staging service
//!
//! Copies user-selected content into a uniquely named scratch file that the
//! root shell can read. The returned [`ScratchFile`] deletes itself when
//! dropped, so the scratch copy never outlives the operation that staged it.
//!
//! On a failed staging attempt the partial file is removed and every
//! orphaned file carrying [`SCRATCH_PREFIX`] is swept from the scratch
//! directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use camsync_core::domain::errors::StagingError;
use camsync_core::domain::newtypes::ContentRef;
use camsync_core::ports::content_resolver::IContentResolver;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// File name prefix of every scratch file
pub const SCRATCH_PREFIX: &str = "camsync_";

/// A staged copy of user content
///
/// Removed from disk on drop unless already discarded.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    size: u64,
    armed: bool,
}

impl ScratchFile {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes copied
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Deletes the file now
    pub async fn discard(mut self) {
        self.armed = false;
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to delete scratch file");
            }
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Stages content into the scratch directory
pub struct MediaStagingService {
    scratch_dir: PathBuf,
    resolver: Arc<dyn IContentResolver>,
}

impl MediaStagingService {
    pub fn new(scratch_dir: PathBuf, resolver: Arc<dyn IContentResolver>) -> Self {
        Self {
            scratch_dir,
            resolver,
        }
    }

    #[must_use]
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Copies `content` into a new scratch file ending in `suffix`
    #[instrument(skip(self, content), fields(content = %content))]
    pub async fn stage(&self, content: &ContentRef, suffix: &str) -> Result<ScratchFile, StagingError> {
        tokio::fs::create_dir_all(&self.scratch_dir).await?;

        let path = self
            .scratch_dir
            .join(format!("{SCRATCH_PREFIX}{}{suffix}", Uuid::new_v4().simple()));

        match self.copy_into(content, &path).await {
            Ok(size) => {
                debug!(path = %path.display(), size, "Content staged");
                Ok(ScratchFile {
                    path,
                    size,
                    armed: true,
                })
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&path).await;
                let removed = self.sweep().await;
                warn!(error = %e, removed, "Staging failed");
                Err(e)
            }
        }
    }

    async fn copy_into(&self, content: &ContentRef, path: &Path) -> Result<u64, StagingError> {
        let mut reader = self.resolver.open(content).await.map_err(resolver_error)?;
        let mut file = tokio::fs::File::create(path).await?;
        let size = tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;
        Ok(size)
    }

    /// Removes every scratch file left in the scratch directory
    ///
    /// Best effort; returns how many files were removed.
    pub async fn sweep(&self) -> usize {
        let mut entries = match tokio::fs::read_dir(&self.scratch_dir).await {
            Ok(entries) => entries,
            Err(_) => return 0,
        };
        let mut removed = 0;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let is_scratch = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(SCRATCH_PREFIX));
            if is_scratch && tokio::fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }
        removed
    }
}

/// Recovers a typed staging error from a resolver failure
fn resolver_error(err: anyhow::Error) -> StagingError {
    match err.downcast::<StagingError>() {
        Ok(staging) => staging,
        Err(other) => match other.downcast::<std::io::Error>() {
            Ok(io) => StagingError::Io(io),
            Err(other) => StagingError::Resolver(format!("{other:#}")),
        },
    }
}
