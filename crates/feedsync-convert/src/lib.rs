//! feedsync Convert Library
//!
//! Turns supplier product feeds (`Root/Urunler/Urun`) into the normalized
//! catalog schema (`products/product`).
//!
//! # Pipeline
//!
//! 1. [`xml::parse`] reads the raw text into an [`xml::XmlDocument`]
//! 2. [`transform::transform`] maps it to a catalog document
//! 3. [`xml::serialize`] writes the catalog document back to text
//!
//! [`convert`] runs all three.
//!
//! # Example
//!
//! ```no_run
//! use feedsync_convert::{convert, TransformOptions};
//!
//! let raw = std::fs::read_to_string("supplier.xml")?;
//! let catalog = convert(&raw, &TransformOptions::default())?;
//! std::fs::write("catalog.xml", catalog)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod catalog;
pub mod numeric;
pub mod source;
pub mod transform;
pub mod xml;

pub use catalog::{CatalogProduct, DecoratedText, Pricing, Variant, VariantSlot};
pub use transform::{transform, transform_products, TransformOptions};

use feedsync_common::Result;
use tracing::debug;

/// Parse, transform and serialize one supplier document.
///
/// A parse failure returns [`feedsync_common::FeedError::Parse`] and produces
/// no output.
pub fn convert(raw: &str, options: &TransformOptions) -> Result<String> {
    let source = xml::parse(raw)?;
    let catalog = transform(&source, options);
    debug!(
        source_root = %source.root.name,
        products = catalog.root.children.len(),
        "Transformed supplier feed"
    );
    xml::serialize(&catalog)
}
