//! Raw product records and the valid-variant filter.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::color::{normalize_color, CanonicalColor};
use crate::diagnostics::{Diagnostic, Diagnostics};

/// A product as returned by the persistence layer.
///
/// Image strings are opaque, already-resolvable URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub variants: Vec<RawVariant>,
}

/// Error loading a product record from disk
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProductError {
    /// File I/O error
    #[error("Failed to read product: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error
    #[error("Failed to parse product JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a product record from JSON text.
pub fn parse_product(json: &str) -> Result<Product, ProductError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a product record from a JSON file.
pub fn load_product(path: &Path) -> Result<Product, ProductError> {
    let contents = fs::read_to_string(path)?;
    parse_product(&contents)
}

/// A purchasable variant exactly as stored upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawVariant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Hex code reported by the fulfillment provider (not always trustworthy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl Default for RawVariant {
    fn default() -> Self {
        Self {
            size: None,
            color: None,
            design: None,
            image: None,
            sku: None,
            hex: None,
            is_available: true,
        }
    }
}

impl RawVariant {
    /// Shorthand used heavily in tests and fixtures.
    pub fn new(size: &str, color: &str) -> Self {
        Self { size: Some(size.to_string()), color: Some(color.to_string()), ..Default::default() }
    }

    pub fn with_design(mut self, design: &str) -> Self {
        self.design = Some(design.to_string());
        self
    }

    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }

    pub fn with_hex(mut self, hex: &str) -> Self {
        self.hex = Some(hex.to_string());
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.is_available = false;
        self
    }
}

/// A variant that survived the validity filter, with its color normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub size: Option<String>,
    /// `None` when the upstream color token is unrecognized
    pub color: Option<CanonicalColor>,
    pub raw_color: Option<String>,
    pub design: Option<String>,
    pub image: Option<String>,
    pub sku: Option<String>,
    pub hex: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Drop variants flagged unavailable or lacking both size and color, and
/// normalize the colors of the rest.
///
/// Unrecognized color tokens are reported to `diagnostics` and kept as
/// `color: None`; they never take part in color resolution.
pub fn valid_variants(product: &Product, diagnostics: &dyn Diagnostics) -> Vec<Variant> {
    product
        .variants
        .iter()
        .filter(|raw| raw.is_available)
        .filter_map(|raw| {
            let size = non_blank(&raw.size);
            let raw_color = non_blank(&raw.color);
            if size.is_none() && raw_color.is_none() {
                return None;
            }

            let color = raw_color.as_deref().and_then(normalize_color);
            if let (None, Some(token)) = (color, raw_color.as_deref()) {
                diagnostics.report(&Diagnostic::UnrecognizedColor {
                    token: token.to_string(),
                    context: format!("variant of product '{}'", product.id),
                });
            }

            Some(Variant {
                size,
                color,
                raw_color,
                design: non_blank(&raw.design),
                image: non_blank(&raw.image),
                sku: non_blank(&raw.sku),
                hex: non_blank(&raw.hex),
            })
        })
        .collect()
}

/// Apparel size ordering; unknown sizes sort after these.
const SIZE_ORDER: &[&str] = &["xxs", "xs", "s", "m", "l", "xl", "xxl", "3xl", "4xl", "5xl"];

fn size_rank(size: &str) -> usize {
    let lower = size.trim().to_lowercase();
    let lower = match lower.as_str() {
        "2xl" => "xxl".to_string(),
        _ => lower,
    };
    SIZE_ORDER.iter().position(|s| *s == lower).unwrap_or(SIZE_ORDER.len())
}

/// Distinct sizes among valid variants, in apparel order.
///
/// Sizes outside the known ordering keep their first-seen order after the
/// known ones.
pub fn available_sizes(variants: &[Variant]) -> Vec<String> {
    let mut sizes: Vec<String> = Vec::new();
    for size in variants.iter().filter_map(|v| v.size.as_ref()) {
        if !sizes.iter().any(|s| s == size) {
            sizes.push(size.clone());
        }
    }
    // Stable sort keeps first-seen order among equal ranks
    sizes.sort_by_key(|s| size_rank(s));
    sizes
}

/// Canonical colors with at least one valid variant at `size`, in canonical order.
pub fn purchasable_colors(variants: &[Variant], size: &str) -> Vec<CanonicalColor> {
    CanonicalColor::ALL
        .into_iter()
        .filter(|color| {
            variants.iter().any(|v| v.color == Some(*color) && v.size.as_deref() == Some(size))
        })
        .collect()
}

/// Whether a valid variant exists for exactly this (size, color).
pub fn has_variant(variants: &[Variant], size: Option<&str>, color: CanonicalColor) -> bool {
    variants.iter().any(|v| v.color == Some(color) && v.size.as_deref() == size)
}

/// Sizes (apparel order) at which `color` has a valid variant.
pub fn sizes_for_color(variants: &[Variant], color: CanonicalColor) -> Vec<String> {
    let matching: Vec<Variant> =
        variants.iter().filter(|v| v.color == Some(color)).cloned().collect();
    available_sizes(&matching)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingDiagnostics, NullDiagnostics};

    fn product(variants: Vec<RawVariant>) -> Product {
        Product { id: "p1".to_string(), name: "Tee".to_string(), variants, ..Default::default() }
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "42",
            "name": "Wormhole Tee",
            "collection": "Cosmos",
            "images": ["/Cosmos/Wormhole/negre/a.png"],
            "variants": [
                {"size": "M", "color": "Negre", "isAvailable": false},
                {"size": "L", "color": "Blanc", "design": "Wormhole"}
            ]
        }"#;
        let parsed: Product = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.collection.as_deref(), Some("Cosmos"));
        assert!(!parsed.variants[0].is_available);
        assert!(parsed.variants[1].is_available);
        assert_eq!(parsed.variants[1].design.as_deref(), Some("Wormhole"));
    }

    #[test]
    fn test_load_product_errors() {
        assert!(matches!(parse_product("{not json"), Err(ProductError::Parse(_))));
        assert!(matches!(
            load_product(Path::new("/nonexistent/product.json")),
            Err(ProductError::Io(_))
        ));
    }

    #[test]
    fn test_load_product_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tee.json");
        fs::write(&path, r#"{"id": "7", "name": "Tee", "variants": [{"size": "S", "color": "Blanc"}]}"#).unwrap();

        let product = load_product(&path).unwrap();
        assert_eq!(product.id, "7");
        assert!(product.images.is_empty());
        assert!(product.variants[0].is_available);
    }

    #[test]
    fn test_valid_variants_drops_unavailable_and_empty() {
        let p = product(vec![
            RawVariant::new("M", "Negre"),
            RawVariant::new("L", "Negre").unavailable(),
            RawVariant { size: Some("  ".to_string()), color: None, ..Default::default() },
            RawVariant { size: Some("S".to_string()), color: None, ..Default::default() },
        ]);
        let valid = valid_variants(&p, &NullDiagnostics);
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].color, Some(CanonicalColor::Black));
        assert_eq!(valid[1].size.as_deref(), Some("S"));
        assert_eq!(valid[1].color, None);
    }

    #[test]
    fn test_unrecognized_color_is_reported_not_guessed() {
        let p = product(vec![RawVariant::new("M", "Turquesa")]);
        let diagnostics = CollectingDiagnostics::new();
        let valid = valid_variants(&p, &diagnostics);

        assert_eq!(valid[0].color, None);
        assert_eq!(valid[0].raw_color.as_deref(), Some("Turquesa"));
        let events = diagnostics.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], Diagnostic::UnrecognizedColor { token, .. } if token == "Turquesa"));
    }

    #[test]
    fn test_available_sizes_apparel_order() {
        let p = product(vec![
            RawVariant::new("XL", "Negre"),
            RawVariant::new("One Size", "Negre"),
            RawVariant::new("S", "Negre"),
            RawVariant::new("M", "Blanc"),
            RawVariant::new("S", "Blanc"),
        ]);
        let valid = valid_variants(&p, &NullDiagnostics);
        assert_eq!(available_sizes(&valid), vec!["S", "M", "XL", "One Size"]);
    }

    #[test]
    fn test_purchasable_colors_for_size() {
        let p = product(vec![
            RawVariant::new("M", "Negre"),
            RawVariant::new("M", "Vermell"),
            RawVariant::new("L", "Blanc"),
        ]);
        let valid = valid_variants(&p, &NullDiagnostics);
        assert_eq!(
            purchasable_colors(&valid, "M"),
            vec![CanonicalColor::Black, CanonicalColor::Red]
        );
        assert_eq!(purchasable_colors(&valid, "L"), vec![CanonicalColor::White]);
        assert!(purchasable_colors(&valid, "XS").is_empty());
        assert_eq!(sizes_for_color(&valid, CanonicalColor::White), vec!["L"]);
        assert!(has_variant(&valid, Some("M"), CanonicalColor::Red));
        assert!(!has_variant(&valid, Some("L"), CanonicalColor::Red));
    }
}
