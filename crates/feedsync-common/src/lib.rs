//! feedsync Common Library
//!
//! Shared error handling and logging for the feedsync workspace.
//!
//! # Overview
//!
//! - **Error Handling**: the [`FeedError`] kinds every pipeline stage reports
//! - **Logging**: `tracing` subscriber setup driven by [`logging::LogConfig`]
//!
//! # Example
//!
//! ```no_run
//! use feedsync_common::{FeedError, Result};
//!
//! fn require_source(source: &str) -> Result<&str> {
//!     if source.is_empty() {
//!         return Err(FeedError::not_found("empty source identifier"));
//!     }
//!     Ok(source)
//! }
//! ```
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{FeedError, Result};
