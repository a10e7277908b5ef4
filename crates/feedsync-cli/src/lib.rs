//! feedsync CLI Library
//!
//! Runs supplier feed conversions as a batch: a job list names each source
//! (URL or local path) and the file name it should be delivered under. Every
//! job is loaded, converted with [`feedsync_convert`] and handed to a
//! [`sink::Sink`] (FTP upload or a local directory).
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod batch;
pub mod config;
pub mod jobs;
pub mod loader;
pub mod sink;

pub use batch::{run_batch, run_job, BatchReport, JobFailure};
pub use config::FtpConfig;
pub use jobs::{Job, JobList};
pub use loader::{DefaultLoader, SourceLoader};
pub use sink::{FtpSink, LocalDirSink, Sink};
