//! Configuration schema types for `gallery.toml`
//!
//! Defines row orderings, the placeholder table, hex overrides, the generic
//! ink row and transition timing, plus the validation rules for each.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::color::{normalize_color, parse_hex, CanonicalColor};
use crate::models::Ink;

/// Slots in every thumbnail row.
pub const ROW_WIDTH: usize = 6;

/// Thumbnail row orderings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RowsConfig {
    /// Light-ink row: dark shirts first
    pub light_ink: Vec<String>,
    /// Dark-ink row: light shirts first
    pub dark_ink: Vec<String>,
}

impl Default for RowsConfig {
    fn default() -> Self {
        Self {
            light_ink: names(&[
                CanonicalColor::Black,
                CanonicalColor::NavyBlue,
                CanonicalColor::RoyalBlue,
                CanonicalColor::ForestGreen,
                CanonicalColor::MilitaryGreen,
                CanonicalColor::Red,
            ]),
            dark_ink: names(&[
                CanonicalColor::White,
                CanonicalColor::HeatherGrey,
                CanonicalColor::Red,
                CanonicalColor::MilitaryGreen,
                CanonicalColor::RoyalBlue,
                CanonicalColor::ForestGreen,
            ]),
        }
    }
}

fn names(colors: &[CanonicalColor]) -> Vec<String> {
    colors.iter().map(|c| c.display_name().to_string()).collect()
}

/// Placeholder assets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Static stand-in photos keyed by color name
    pub images: HashMap<String, String>,
    /// Icon mask drawn over synthesized color swatches
    pub icon_mask: String,
    /// Icon mask for the generic gray swatch
    pub generic_icon_mask: String,
    /// Background of the generic swatch
    pub generic_hex: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            images: HashMap::from([
                ("White".to_string(), "placeholders/tee-white.png".to_string()),
                ("Black".to_string(), "placeholders/tee-black.png".to_string()),
            ]),
            icon_mask: "placeholders/tee-mask.svg".to_string(),
            generic_icon_mask: "placeholders/generic-mask.svg".to_string(),
            generic_hex: "#9E9E9E".to_string(),
        }
    }
}

/// Ink classification settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InkConfig {
    /// Row that designs with undeterminable ink are placed in
    pub generic_row: Ink,
}

impl Default for InkConfig {
    fn default() -> Self {
        Self { generic_row: Ink::Light }
    }
}

/// Main image transition settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransitionConfig {
    /// Crossfade duration for color changes
    pub fade_ms: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { fade_ms: 250 }
    }
}

/// Root configuration structure for `gallery.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GalleryConfig {
    pub rows: RowsConfig,
    pub placeholders: PlaceholderConfig,
    /// Overrides of the known-correct hex table, keyed by color name
    pub hex: HashMap<String, String>,
    pub ink: InkConfig,
    pub transition: TransitionConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "rows.light_ink")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gallery.toml: '{}' {}", self.field, self.message)
    }
}

impl GalleryConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        validate_row("rows.light_ink", &self.rows.light_ink, &mut errors);
        validate_row("rows.dark_ink", &self.rows.dark_ink, &mut errors);

        for (name, path) in &self.placeholders.images {
            if normalize_color(name).is_none() {
                errors.push(ConfigValidationError {
                    field: format!("placeholders.images.{}", name),
                    message: "is not a recognized color".to_string(),
                });
            }
            if path.trim().is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("placeholders.images.{}", name),
                    message: "must be a non-empty path".to_string(),
                });
            }
        }

        if self.placeholders.icon_mask.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "placeholders.icon_mask".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }
        if self.placeholders.generic_icon_mask.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "placeholders.generic_icon_mask".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }
        if let Err(e) = parse_hex(&self.placeholders.generic_hex) {
            errors.push(ConfigValidationError {
                field: "placeholders.generic_hex".to_string(),
                message: e.to_string(),
            });
        }

        for (name, hex) in &self.hex {
            if normalize_color(name).is_none() {
                errors.push(ConfigValidationError {
                    field: format!("hex.{}", name),
                    message: "is not a recognized color".to_string(),
                });
            }
            if let Err(e) = parse_hex(hex) {
                errors.push(ConfigValidationError { field: format!("hex.{}", name), message: e.to_string() });
            }
        }

        errors
    }

    /// Resolved color order for an ink row. Unrecognized names are skipped.
    pub fn row_order(&self, ink: Ink) -> Vec<CanonicalColor> {
        let names = match ink {
            Ink::Light => &self.rows.light_ink,
            Ink::Dark => &self.rows.dark_ink,
        };
        names.iter().filter_map(|n| normalize_color(n)).collect()
    }

    /// Static placeholder photos keyed by canonical color.
    pub fn placeholder_images(&self) -> HashMap<CanonicalColor, String> {
        self.placeholders
            .images
            .iter()
            .filter_map(|(name, path)| normalize_color(name).map(|c| (c, path.clone())))
            .collect()
    }

    /// Hex overrides keyed by canonical color.
    pub fn hex_overrides(&self) -> HashMap<CanonicalColor, String> {
        self.hex
            .iter()
            .filter_map(|(name, hex)| normalize_color(name).map(|c| (c, hex.clone())))
            .collect()
    }
}

fn validate_row(field: &str, names: &[String], errors: &mut Vec<ConfigValidationError>) {
    if names.len() != ROW_WIDTH {
        errors.push(ConfigValidationError {
            field: field.to_string(),
            message: format!("must list exactly {} colors, found {}", ROW_WIDTH, names.len()),
        });
    }

    let mut seen = HashSet::new();
    for name in names {
        match normalize_color(name) {
            None => errors.push(ConfigValidationError {
                field: field.to_string(),
                message: format!("'{}' is not a recognized color", name),
            }),
            Some(color) => {
                if !seen.insert(color) {
                    errors.push(ConfigValidationError {
                        field: field.to_string(),
                        message: format!("'{}' appears more than once", color),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GalleryConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_rows_are_six_wide() {
        let config = GalleryConfig::default();
        let light = config.row_order(Ink::Light);
        let dark = config.row_order(Ink::Dark);
        assert_eq!(light.len(), ROW_WIDTH);
        assert_eq!(dark.len(), ROW_WIDTH);
        assert_eq!(light[0], CanonicalColor::Black);
        assert_eq!(dark[0], CanonicalColor::White);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: GalleryConfig = toml::from_str("[transition]\nfade_ms = 400\n").unwrap();
        assert_eq!(config.transition.fade_ms, 400);
        assert_eq!(config.rows, RowsConfig::default());
        assert_eq!(config.ink.generic_row, Ink::Light);
    }

    #[test]
    fn test_full_toml() {
        let toml_str = r##"
[rows]
light_ink = ["negre", "blau mari", "vermell", "verd bosc", "verd militar", "blau royal"]
dark_ink = ["blanc", "gris", "vermell", "verd militar", "blau royal", "verd bosc"]

[placeholders]
icon_mask = "masks/tee.svg"

[placeholders.images]
Royal-Blue = "ph/royal.png"

[hex]
Red = "#D00000"

[ink]
generic_row = "dark"
"##;
        let config: GalleryConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());
        assert_eq!(
            config.row_order(Ink::Light),
            vec![
                CanonicalColor::Black,
                CanonicalColor::NavyBlue,
                CanonicalColor::Red,
                CanonicalColor::ForestGreen,
                CanonicalColor::MilitaryGreen,
                CanonicalColor::RoyalBlue,
            ]
        );
        assert_eq!(config.ink.generic_row, Ink::Dark);
        assert_eq!(
            config.placeholder_images().get(&CanonicalColor::RoyalBlue).map(String::as_str),
            Some("ph/royal.png")
        );
        assert_eq!(config.hex_overrides().get(&CanonicalColor::Red).map(String::as_str), Some("#D00000"));
    }

    #[test]
    fn test_validation_collects_every_problem() {
        let mut config = GalleryConfig::default();
        config.rows.light_ink = vec!["negre".to_string(), "black".to_string(), "turquoise".to_string()];
        config.rows.dark_ink.clear();
        config.hex.insert("Red".to_string(), "red".to_string());
        config.placeholders.generic_hex = "#12".to_string();

        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(errors.len(), 6, "{:?}", errors);
        assert!(fields.contains(&"rows.dark_ink"));
        assert!(fields.contains(&"hex.Red"));
        assert!(fields.contains(&"placeholders.generic_hex"));
        assert_eq!(fields.iter().filter(|f| **f == "rows.light_ink").count(), 3);
    }

    #[test]
    fn test_rows_must_be_six_wide() {
        let mut config = GalleryConfig::default();
        config.rows.light_ink.truncate(1);
        config.rows.dark_ink.push("Navy-Blue".to_string());

        let errors = config.validate();
        assert_eq!(errors.len(), 2, "{:?}", errors);
        assert_eq!(errors[0].field, "rows.light_ink");
        assert!(errors[0].message.contains("found 1"));
        assert_eq!(errors[1].field, "rows.dark_ink");
        assert!(errors[1].message.contains("found 7"));
    }
}
