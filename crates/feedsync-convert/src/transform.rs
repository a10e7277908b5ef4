//! Supplier feed -> catalog mapping
//!
//! Pure functions over an already-parsed document. Nothing here fails: absent
//! or malformed optional fields fall back to their defaults.

use crate::catalog::{catalog_document, CatalogProduct, DecoratedText, Pricing, Variant, VariantSlot};
use crate::numeric::percent_to_rate;
use crate::source::{ResolvedAttribute, ResolvedOption, ResolvedProduct, SourceProduct, PRODUCTS_PATH, PRODUCT_ELEMENT};
use crate::xml::XmlDocument;

/// Separator that replaces `/` in the composed category label
pub const CATEGORY_SEPARATOR: &str = " >>> ";

const SIZE_TAG: &str = "BEDEN";
const COLOR_TAG: &str = "RENK";

/// Fixed values stamped onto every converted product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub currency: String,
    pub color_label: String,
    pub size_label: String,
    /// `Aktif` token that marks a product as active
    pub active_marker: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            currency: "TRY".to_string(),
            color_label: "Color".to_string(),
            size_label: "Size".to_string(),
            active_marker: "Evet".to_string(),
        }
    }
}

/// Map a parsed supplier document to a parsed catalog document.
///
/// A document without `Root/Urunler` yields an empty `products` root.
pub fn transform(source: &XmlDocument, options: &TransformOptions) -> XmlDocument {
    catalog_document(&transform_products(source, options))
}

/// Same mapping as [`transform`], stopping at the typed records
pub fn transform_products(source: &XmlDocument, options: &TransformOptions) -> Vec<CatalogProduct> {
    let Some(listing) = source.find(&PRODUCTS_PATH) else {
        return Vec::new();
    };

    listing
        .children_named(PRODUCT_ELEMENT)
        .map(|element| map_product(SourceProduct::from_element(element).resolve(), options))
        .collect()
}

/// Build one catalog product from a resolved supplier product
pub fn map_product(product: ResolvedProduct, options: &TransformOptions) -> CatalogProduct {
    let mut segments = product.category_tree.split('/');
    let main_category = segments.next().unwrap_or_default().to_string();
    let top_category = segments.next().unwrap_or_default().to_string();

    let pricing = product.options.first().map(|first| Pricing {
        list_price: first.sale_price.clone(),
        price: first.cost_price.clone(),
        tax: percent_to_rate(&first.tax_rate),
        currency: options.currency.clone(),
        desi: first.desi.clone(),
    });
    let product_code = product
        .options
        .first()
        .map(|first| first.stock_code.clone())
        .unwrap_or_default();

    CatalogProduct {
        id: product.id,
        product_code,
        barcode: String::new(),
        main_category: main_category.into(),
        top_category: top_category.into(),
        sub_category: product.category.into(),
        sub_category_extra: DecoratedText::default(),
        category_id: product.category_id,
        category: product.category_tree.replace('/', CATEGORY_SEPARATOR).into(),
        active: product.active == options.active_marker,
        brand_id: product.brand_id,
        brand: product.brand.into(),
        name: product.name.into(),
        description: product.description.into(),
        variants: product
            .options
            .iter()
            .map(|option| map_variant(option, options))
            .collect(),
        images: product.images,
        pricing,
    }
}

/// Build the Color/Size variant for one option group.
///
/// A tag that contains `BEDEN` fills Size; a tag equal to `RENK` fills Color.
/// Matching ignores case and the last matching entry wins.
pub fn map_variant(option: &ResolvedOption, options: &TransformOptions) -> Variant {
    let mut color = String::new();
    let mut size = String::new();

    for ResolvedAttribute { tag, value } in &option.attributes {
        if tag.is_empty() {
            continue;
        }
        let tag = tag.to_uppercase();
        if tag.contains(SIZE_TAG) {
            size = value.clone();
        } else if tag == COLOR_TAG {
            color = value.clone();
        }
    }

    Variant {
        color: VariantSlot {
            label: options.color_label.clone(),
            value: color,
        },
        size: VariantSlot {
            label: options.size_label.clone(),
            value: size,
        },
        quantity: option.quantity.clone(),
        barcode: option.barcode.clone(),
    }
}
