//! Error types for feedsync
//!
//! Every stage of a conversion job (load, parse, transform, deliver) reports
//! failures as one of these kinds. The batch driver catches them per job.

use thiserror::Error;

/// Result type alias for feedsync operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Main error type for feedsync
#[derive(Error, Debug)]
pub enum FeedError {
    /// Local source file does not exist
    #[error("Source not found: {0}")]
    NotFound(String),

    /// Retrieval failed for any reason other than a missing local file
    #[error("Failed to fetch source: {0}")]
    Fetch(String),

    /// Source text is not well-formed XML
    #[error("XML parse error: {0}")]
    Parse(String),

    /// Mapping or serializing the catalog document failed
    #[error("Transform error: {0}")]
    Transform(String),

    /// Sink connection or write failed
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn transform(msg: impl Into<String>) -> Self {
        Self::Transform(msg.into())
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short machine-friendly name of the error kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Fetch(_) => "fetch",
            Self::Parse(_) => "parse",
            Self::Transform(_) => "transform",
            Self::Delivery(_) => "delivery",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }
}
