//! Job list (`urls.txt`) parsing
//!
//! One job per line: `<url-or-path> <destination-file-name>`. The first
//! whitespace run separates the two; the destination keeps its inner words,
//! joined by single spaces. Blank lines and `#` comments are skipped.

use feedsync_common::{FeedError, Result};
use std::path::Path;

pub const DEFAULT_JOBS_FILE: &str = "urls.txt";

/// One conversion job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source: String,
    pub destination: String,
    /// 1-based line number in the job list
    pub line: usize,
}

/// A non-comment line that does not describe a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub line: usize,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobList {
    pub jobs: Vec<Job>,
    pub rejected: Vec<RejectedLine>,
}

impl JobList {
    pub fn parse(text: &str) -> Self {
        let mut list = Self::default();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let source = tokens.next().unwrap_or_default();
            let destination = tokens.collect::<Vec<_>>().join(" ");

            if destination.is_empty() {
                list.rejected.push(RejectedLine {
                    line: index + 1,
                    content: line.to_string(),
                });
            } else {
                list.jobs.push(Job {
                    source: source.to_string(),
                    destination,
                    line: index + 1,
                });
            }
        }

        list
    }

    /// Read and parse a job list file
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                FeedError::not_found(format!("job list '{}'", path.display()))
            },
            _ => FeedError::Io(e),
        })?;
        Ok(Self::parse(&text))
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
