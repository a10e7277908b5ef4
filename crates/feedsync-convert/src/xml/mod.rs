//! Parse/serialize adapter between XML text and the element tree
//!
//! Parsing uses quick-xml's pull reader; serializing uses its indenting
//! writer. Neither side holds configuration, so both are free functions.

mod reader;
mod tree;
mod writer;

pub use reader::parse;
pub use tree::{XmlDocument, XmlElement};
pub use writer::serialize;
