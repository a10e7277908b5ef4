//! Local directory sink, used for dry runs and local mirrors

use async_trait::async_trait;
use feedsync_common::{FeedError, Result};
use std::path::{Component, Path, PathBuf};
use tracing::info;

use super::Sink;

pub struct LocalDirSink {
    dir: PathBuf,
}

impl LocalDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Destination path inside the sink directory; rejects names that would
    /// escape it.
    fn target(&self, destination_name: &str) -> Result<PathBuf> {
        let name = Path::new(destination_name);
        let escapes = name
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if destination_name.trim().is_empty() || escapes {
            return Err(FeedError::delivery(format!(
                "destination '{}' is not a relative file name",
                destination_name
            )));
        }
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl Sink for LocalDirSink {
    async fn deliver(&self, content: &str, destination_name: &str) -> Result<()> {
        let target = self.target(destination_name)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                FeedError::delivery(format!("cannot create '{}': {}", parent.display(), e))
            })?;
        }

        tokio::fs::write(&target, content).await.map_err(|e| {
            FeedError::delivery(format!("cannot write '{}': {}", target.display(), e))
        })?;

        info!(path = %target.display(), bytes = content.len(), "Saved catalog");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("dir://{}", self.dir.display())
    }
}
