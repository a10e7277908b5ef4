//! Delivery of converted catalog documents

mod ftp;
mod local;

pub use ftp::FtpSink;
pub use local::LocalDirSink;

use async_trait::async_trait;
use feedsync_common::Result;

/// Destination for serialized catalog documents
#[async_trait]
pub trait Sink: Send + Sync {
    /// Write `content` under `destination_name`
    async fn deliver(&self, content: &str, destination_name: &str) -> Result<()>;

    /// Short description for log lines, e.g. `ftp://host:21/dir`
    fn describe(&self) -> String;
}
