//! Supplier feed records (`Root/Urunler/Urun`)
//!
//! Extraction keeps every field optional. A field counts as present only when
//! its element exists and carries non-empty text. [`SourceProduct::resolve`] is
//! the single pass that turns the optional record into fully defaulted values.

use crate::xml::XmlElement;

/// Path from the document root to the repeating product element
pub const PRODUCTS_PATH: [&str; 2] = ["Root", "Urunler"];
pub const PRODUCT_ELEMENT: &str = "Urun";

/// One supplier product record before defaults are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceProduct {
    pub id: Option<String>,
    /// Slash-delimited category path, e.g. `Giyim/Kadın/Elbise`
    pub category_tree: Option<String>,
    pub category_id: Option<String>,
    /// Leaf category label, independent of `category_tree`
    pub category: Option<String>,
    pub brand_id: Option<String>,
    pub brand: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<String>,
    /// Image references in source order; empty `<Resim/>` entries are kept
    pub images: Vec<String>,
    pub options: Vec<OptionGroup>,
}

/// One purchasable option (`UrunSecenek/Secenek`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionGroup {
    pub sale_price: Option<String>,
    pub cost_price: Option<String>,
    /// Integer percentage, e.g. `18`
    pub tax_rate: Option<String>,
    pub desi: Option<String>,
    pub stock_code: Option<String>,
    pub quantity: Option<String>,
    pub barcode: Option<String>,
    pub attributes: Vec<AttributeEntry>,
}

/// One `EkSecenekOzellik/Ozellik` entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeEntry {
    /// `Tanim` attribute, e.g. `Renk` or `Beden`
    pub tag: Option<String>,
    /// `Deger` attribute
    pub value: Option<String>,
    /// Inline element text, used when `Deger` is missing
    pub text: Option<String>,
}

fn text_field(element: &XmlElement, name: &str) -> Option<String> {
    element
        .child_text(name)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

impl SourceProduct {
    pub fn from_element(element: &XmlElement) -> Self {
        Self {
            id: text_field(element, "UrunKartiID"),
            category_tree: text_field(element, "KategoriTree"),
            category_id: text_field(element, "KategoriID"),
            category: text_field(element, "Kategori"),
            brand_id: text_field(element, "MarkaID"),
            brand: text_field(element, "Marka"),
            name: text_field(element, "UrunAdi"),
            description: text_field(element, "Aciklama"),
            active: text_field(element, "Aktif"),
            images: element
                .grouped("Resimler", "Resim")
                .into_iter()
                .map(|image| image.text.clone())
                .collect(),
            options: element
                .grouped("UrunSecenek", "Secenek")
                .into_iter()
                .map(OptionGroup::from_element)
                .collect(),
        }
    }

    /// Apply defaults: every missing string becomes `""`.
    pub fn resolve(self) -> ResolvedProduct {
        ResolvedProduct {
            id: self.id.unwrap_or_default(),
            category_tree: self.category_tree.unwrap_or_default(),
            category_id: self.category_id.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            brand_id: self.brand_id.unwrap_or_default(),
            brand: self.brand.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            active: self.active.unwrap_or_default(),
            images: self.images,
            options: self.options.into_iter().map(OptionGroup::resolve).collect(),
        }
    }
}

impl OptionGroup {
    pub fn from_element(element: &XmlElement) -> Self {
        Self {
            sale_price: text_field(element, "SatisFiyati"),
            cost_price: text_field(element, "AlisFiyati"),
            tax_rate: text_field(element, "KdvOrani"),
            desi: text_field(element, "Desi"),
            stock_code: text_field(element, "StokKodu"),
            quantity: text_field(element, "StokAdedi"),
            barcode: text_field(element, "Barkod"),
            attributes: element
                .grouped("EkSecenekOzellik", "Ozellik")
                .into_iter()
                .map(AttributeEntry::from_element)
                .collect(),
        }
    }

    /// Apply defaults; a missing stock quantity becomes `"0"`.
    pub fn resolve(self) -> ResolvedOption {
        ResolvedOption {
            sale_price: self.sale_price.unwrap_or_default(),
            cost_price: self.cost_price.unwrap_or_default(),
            tax_rate: self.tax_rate.unwrap_or_default(),
            desi: self.desi.unwrap_or_default(),
            stock_code: self.stock_code.unwrap_or_default(),
            quantity: self.quantity.unwrap_or_else(|| "0".to_string()),
            barcode: self.barcode.unwrap_or_default(),
            attributes: self
                .attributes
                .into_iter()
                .map(AttributeEntry::resolve)
                .collect(),
        }
    }
}

impl AttributeEntry {
    pub fn from_element(element: &XmlElement) -> Self {
        Self {
            tag: non_empty(element.attribute("Tanim")),
            value: non_empty(element.attribute("Deger")),
            text: non_empty(Some(element.text.as_str())),
        }
    }

    /// Tag plus value, where the value falls back from `Deger` to inline text
    /// to `""`.
    pub fn resolve(self) -> ResolvedAttribute {
        ResolvedAttribute {
            tag: self.tag.unwrap_or_default(),
            value: self.value.or(self.text).unwrap_or_default(),
        }
    }
}

/// A supplier product with every default applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedProduct {
    pub id: String,
    pub category_tree: String,
    pub category_id: String,
    pub category: String,
    pub brand_id: String,
    pub brand: String,
    pub name: String,
    pub description: String,
    pub active: String,
    pub images: Vec<String>,
    pub options: Vec<ResolvedOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOption {
    pub sale_price: String,
    pub cost_price: String,
    pub tax_rate: String,
    pub desi: String,
    pub stock_code: String,
    pub quantity: String,
    pub barcode: String,
    pub attributes: Vec<ResolvedAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAttribute {
    pub tag: String,
    pub value: String,
}
