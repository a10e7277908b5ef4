//! Normalized catalog records (`products/product`) and their XML shape

use crate::numeric::leading_integer;
use crate::xml::{XmlDocument, XmlElement};

pub const CATALOG_ROOT: &str = "products";
pub const CATALOG_PRODUCT: &str = "product";

/// Text value written as its own node so attributes can be attached later
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoratedText {
    pub text: String,
    pub attributes: Vec<(String, String)>,
}

impl DecoratedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: Vec::new(),
        }
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut element = XmlElement::with_text(name, self.text.clone());
        element.attributes = self.attributes.clone();
        element
    }
}

impl From<String> for DecoratedText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for DecoratedText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// A labelled attribute slot on a variant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSlot {
    pub label: String,
    pub value: String,
}

/// One purchasable variant with fixed Color and Size slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variant {
    pub color: VariantSlot,
    pub size: VariantSlot,
    /// Stock quantity exactly as supplied, `"0"` when absent
    pub quantity: String,
    pub barcode: String,
}

impl Variant {
    pub fn quantity_value(&self) -> i64 {
        leading_integer(&self.quantity)
    }

    fn to_element(&self) -> XmlElement {
        let mut element = XmlElement::new("variant");
        element
            .push_child(XmlElement::with_text("name1", self.color.label.clone()))
            .push_child(XmlElement::with_text("value1", self.color.value.clone()))
            .push_child(XmlElement::with_text("name2", self.size.label.clone()))
            .push_child(XmlElement::with_text("value2", self.size.value.clone()))
            .push_child(XmlElement::with_text("quantity", self.quantity.clone()))
            .push_child(XmlElement::with_text("barcode", self.barcode.clone()));
        element
    }
}

/// Price block copied from the first option group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pricing {
    pub list_price: String,
    pub price: String,
    /// Decimal rate, e.g. `0.18`
    pub tax: String,
    pub currency: String,
    pub desi: String,
}

/// One normalized catalog product
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogProduct {
    pub id: String,
    pub product_code: String,
    pub barcode: String,
    pub main_category: DecoratedText,
    pub top_category: DecoratedText,
    pub sub_category: DecoratedText,
    /// Reserved fourth category level, always empty today
    pub sub_category_extra: DecoratedText,
    pub category_id: String,
    /// Full category path with `" >>> "` separators
    pub category: DecoratedText,
    pub active: bool,
    pub brand_id: String,
    pub brand: DecoratedText,
    pub name: DecoratedText,
    pub description: DecoratedText,
    pub variants: Vec<Variant>,
    /// Written as `image1`..`imageN`
    pub images: Vec<String>,
    /// `None` when the source product has no option groups
    pub pricing: Option<Pricing>,
}

impl CatalogProduct {
    /// Sum of the variant quantities; non-numeric quantities count as 0
    pub fn quantity(&self) -> i64 {
        self.variants
            .iter()
            .map(Variant::quantity_value)
            .fold(0i64, i64::saturating_add)
    }

    pub fn to_element(&self) -> XmlElement {
        let mut product = XmlElement::new(CATALOG_PRODUCT);
        product
            .push_child(XmlElement::with_text("id", self.id.clone()))
            .push_child(XmlElement::with_text("productCode", self.product_code.clone()))
            .push_child(XmlElement::with_text("barcode", self.barcode.clone()))
            .push_child(self.main_category.to_element("main_category"))
            .push_child(self.top_category.to_element("top_category"))
            .push_child(self.sub_category.to_element("sub_category"))
            .push_child(self.sub_category_extra.to_element("sub_category_"))
            .push_child(XmlElement::with_text("categoryID", self.category_id.clone()))
            .push_child(self.category.to_element("category"))
            .push_child(XmlElement::with_text("active", if self.active { "1" } else { "0" }))
            .push_child(XmlElement::with_text("brandID", self.brand_id.clone()))
            .push_child(self.brand.to_element("brand"))
            .push_child(self.name.to_element("name"))
            .push_child(self.description.to_element("description"));

        let mut variants = XmlElement::new("variants");
        for variant in &self.variants {
            variants.push_child(variant.to_element());
        }
        product.push_child(variants);

        for (index, image) in self.images.iter().enumerate() {
            product.push_child(XmlElement::with_text(format!("image{}", index + 1), image.clone()));
        }

        if let Some(pricing) = &self.pricing {
            product
                .push_child(XmlElement::with_text("listPrice", pricing.list_price.clone()))
                .push_child(XmlElement::with_text("price", pricing.price.clone()))
                .push_child(XmlElement::with_text("tax", pricing.tax.clone()))
                .push_child(XmlElement::with_text("currency", pricing.currency.clone()))
                .push_child(XmlElement::with_text("desi", pricing.desi.clone()));
        }

        product.push_child(XmlElement::with_text("quantity", self.quantity().to_string()));
        product
    }
}

/// Wrap products in the `products` root element
pub fn catalog_document(products: &[CatalogProduct]) -> XmlDocument {
    let mut root = XmlElement::new(CATALOG_ROOT);
    for product in products {
        root.push_child(product.to_element());
    }
    XmlDocument::new(root)
}
