//! Per-design evidence gathered from variants and asset paths.

use crate::color::{fold_token, CanonicalColor, ShirtTone};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::models::Variant;
use crate::path::{parse_image_path, tokenize, ImagePath};

/// One photo attributed to a design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignAsset {
    pub url: String,
    /// Shirt color from the color directory, else from the owning variant
    pub shirt_color: Option<CanonicalColor>,
    /// Folded file-name tokens, kept for the filename-token tier
    pub file_tokens: Vec<String>,
}

/// Everything known about one design of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignEvidence {
    /// Label as first seen (variant design field or design directory)
    pub label: String,
    /// Folded label used for matching
    pub key: String,
    /// Distinct shirt colors in order of discovery
    pub shirt_colors: Vec<CanonicalColor>,
    pub assets: Vec<DesignAsset>,
}

impl DesignEvidence {
    fn new(label: &str) -> Self {
        Self {
            label: label.trim().to_string(),
            key: fold_token(label),
            shirt_colors: Vec::new(),
            assets: Vec::new(),
        }
    }

    fn add_color(&mut self, color: CanonicalColor) {
        if !self.shirt_colors.contains(&color) {
            self.shirt_colors.push(color);
        }
    }

    fn add_asset(&mut self, url: &str, shirt_color: Option<CanonicalColor>, path: Option<&ImagePath>) {
        if let Some(color) = shirt_color {
            self.add_color(color);
        }
        if self.assets.iter().any(|a| a.url == url) {
            return;
        }
        let file_tokens = match path {
            Some(p) => p.file_tokens(),
            None => url.rsplit('/').next().map(|f| tokenize(strip_extension(f))).unwrap_or_default(),
        };
        self.assets.push(DesignAsset { url: url.to_string(), shirt_color, file_tokens });
    }

    pub fn has_tone(&self, tone: ShirtTone) -> bool {
        self.shirt_colors.iter().any(|c| c.shirt_tone() == tone)
    }

    /// First asset photographed on the given shirt color.
    pub fn asset_for(&self, color: CanonicalColor) -> Option<&DesignAsset> {
        self.assets.iter().find(|a| a.shirt_color == Some(color))
    }
}

fn strip_extension(file: &str) -> &str {
    let file = file.split(['?', '#']).next().unwrap_or(file);
    match file.rfind('.') {
        Some(0) | None => file,
        Some(dot) => &file[..dot],
    }
}

/// Ordered collection of a product's designs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesignCatalog {
    designs: Vec<DesignEvidence>,
}

impl DesignCatalog {
    /// Gather design evidence.
    ///
    /// Variants are scanned first, then the product image list, so the order
    /// of first appearance follows the variant records. Image paths without
    /// design/color directories, or whose color directory names no known
    /// shirt color, cannot be attributed and are reported.
    pub fn collect(variants: &[Variant], images: &[String], diagnostics: &dyn Diagnostics) -> Self {
        let mut catalog = Self::default();

        for variant in variants {
            let parsed = variant.image.as_deref().and_then(parse_image_path);
            let label = variant
                .design
                .as_deref()
                .or_else(|| parsed.as_ref().map(|p| p.design_segment.as_str()));
            let Some(label) = label else {
                continue;
            };

            let design = catalog.entry(label);
            if let Some(color) = variant.color {
                design.add_color(color);
            }
            if let Some(url) = variant.image.as_deref() {
                let shirt_color = parsed.as_ref().and_then(ImagePath::shirt_color).or(variant.color);
                design.add_asset(url, shirt_color, parsed.as_ref());
            }
        }

        for url in images {
            let Some(parsed) = parse_image_path(url) else {
                diagnostics.report(&Diagnostic::UnparseablePath { url: url.clone() });
                continue;
            };
            let Some(shirt_color) = parsed.shirt_color() else {
                diagnostics.report(&Diagnostic::UnrecognizedColor {
                    token: parsed.color_segment.clone(),
                    context: format!("asset '{}'", url),
                });
                continue;
            };
            catalog.entry(&parsed.design_segment).add_asset(url, Some(shirt_color), Some(&parsed));
        }

        catalog
    }

    fn entry(&mut self, label: &str) -> &mut DesignEvidence {
        let key = fold_token(label);
        let index = match self.designs.iter().position(|d| d.key == key) {
            Some(index) => index,
            None => {
                self.designs.push(DesignEvidence::new(label));
                self.designs.len() - 1
            }
        };
        &mut self.designs[index]
    }

    pub fn designs(&self) -> &[DesignEvidence] {
        &self.designs
    }

    pub fn len(&self) -> usize {
        self.designs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }

    /// Look up a design by any spelling of its label.
    pub fn get(&self, label: &str) -> Option<&DesignEvidence> {
        let key = fold_token(label);
        self.designs.iter().find(|d| d.key == key)
    }
}
