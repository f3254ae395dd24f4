//! Placeholder resolution for colors without a real photo
//!
//! Resolution never fails: a color with a static stand-in photo gets that
//! photo, any other color gets a synthesized swatch, and the worst case is a
//! generic gray swatch.
//!
//! Display hex resolution lives here too, because upstream variants report
//! hex codes that cannot be trusted blindly: a known data defect makes every
//! variant of some products report white.

use image::{Rgba, RgbaImage};
use std::collections::HashMap;

use crate::color::{format_hex, is_white, parse_hex, CanonicalColor};
use crate::config::GalleryConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::models::Placeholder;

/// Fallback for a swatch whose background cannot be parsed
const GRAY: Rgba<u8> = Rgba([0x9E, 0x9E, 0x9E, 255]);

/// Per-color placeholder and hex lookup.
#[derive(Debug, Clone)]
pub struct PlaceholderResolver {
    images: HashMap<CanonicalColor, String>,
    hex_overrides: HashMap<CanonicalColor, String>,
    icon_mask: String,
    generic_icon_mask: String,
    generic_hex: String,
}

impl Default for PlaceholderResolver {
    fn default() -> Self {
        Self::from_config(&GalleryConfig::default())
    }
}

impl PlaceholderResolver {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            images: config.placeholder_images(),
            hex_overrides: config.hex_overrides(),
            icon_mask: config.placeholders.icon_mask.clone(),
            generic_icon_mask: config.placeholders.generic_icon_mask.clone(),
            generic_hex: config.placeholders.generic_hex.clone(),
        }
    }

    /// Known-correct hex for a color, honoring configured overrides.
    pub fn known_hex(&self, color: CanonicalColor) -> String {
        self.hex_overrides
            .get(&color)
            .and_then(|hex| parse_hex(hex).ok())
            .map(format_hex)
            .unwrap_or_else(|| color.known_hex().to_string())
    }

    /// Stand-in for a color, using its known hex for swatches.
    pub fn resolve(&self, color: CanonicalColor) -> Placeholder {
        self.resolve_with_hex(color, &self.known_hex(color))
    }

    /// Stand-in for a color, using `hex` as the swatch background.
    pub fn resolve_with_hex(&self, color: CanonicalColor, hex: &str) -> Placeholder {
        match self.images.get(&color) {
            Some(path) => Placeholder::Image { color, path: path.clone() },
            None => Placeholder::Swatch {
                color: Some(color),
                background_hex: hex.to_string(),
                icon_mask: self.icon_mask.clone(),
            },
        }
    }

    /// The worst-case stand-in: a gray swatch with the generic mask.
    pub fn generic(&self) -> Placeholder {
        Placeholder::Swatch {
            color: None,
            background_hex: self.generic_hex.clone(),
            icon_mask: self.generic_icon_mask.clone(),
        }
    }

    /// Pick the hex shown for a color slot.
    ///
    /// Takes the first reported hex that parses and is not white on a
    /// non-White color; otherwise the known table. Every discarded report is
    /// passed to `diagnostics`.
    pub fn display_hex(
        &self,
        color: CanonicalColor,
        reported: &[&str],
        diagnostics: &dyn Diagnostics,
    ) -> String {
        let mut seen: Vec<&str> = Vec::new();
        for &hex in reported {
            if seen.contains(&hex) {
                continue;
            }
            seen.push(hex);

            match parse_hex(hex) {
                Ok(parsed) if is_white(parsed) && color != CanonicalColor::White => {
                    diagnostics.report(&Diagnostic::HexDiscarded { color, reported: hex.to_string() });
                }
                Ok(parsed) => return format_hex(parsed),
                Err(e) => {
                    log::debug!("unparseable hex '{}' for {}: {}", hex, color, e);
                    diagnostics.report(&Diagnostic::HexDiscarded { color, reported: hex.to_string() });
                }
            }
        }

        self.known_hex(color)
    }
}

/// Background color of a placeholder as RGBA.
pub fn placeholder_rgba(placeholder: &Placeholder) -> Rgba<u8> {
    match placeholder {
        Placeholder::Image { color, .. } => parse_hex(color.known_hex()).unwrap_or(GRAY),
        Placeholder::Swatch { background_hex, .. } => parse_hex(background_hex).unwrap_or(GRAY),
    }
}

/// Paint a solid square preview of a placeholder's background color.
pub fn render_swatch(placeholder: &Placeholder, size: u32) -> RgbaImage {
    RgbaImage::from_pixel(size.max(1), size.max(1), placeholder_rgba(placeholder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingDiagnostics, NullDiagnostics};

    #[test]
    fn test_static_placeholder_for_base_colors() {
        let resolver = PlaceholderResolver::default();
        assert_eq!(
            resolver.resolve(CanonicalColor::White),
            Placeholder::Image {
                color: CanonicalColor::White,
                path: "placeholders/tee-white.png".to_string()
            }
        );
        assert_eq!(resolver.resolve(CanonicalColor::Black).src(), "placeholders/tee-black.png");
    }

    #[test]
    fn test_swatch_for_other_colors() {
        let resolver = PlaceholderResolver::default();
        let placeholder = resolver.resolve(CanonicalColor::ForestGreen);
        assert_eq!(
            placeholder,
            Placeholder::Swatch {
                color: Some(CanonicalColor::ForestGreen),
                background_hex: "#1F4D2B".to_string(),
                icon_mask: "placeholders/tee-mask.svg".to_string(),
            }
        );
    }

    #[test]
    fn test_every_color_resolves() {
        let resolver = PlaceholderResolver::default();
        for color in CanonicalColor::ALL {
            let placeholder = resolver.resolve(color);
            assert_eq!(placeholder.color(), Some(color));
            assert!(!placeholder.src().is_empty());
        }
        assert_eq!(resolver.generic().color(), None);
    }

    #[test]
    fn test_display_hex_uses_reported() {
        let resolver = PlaceholderResolver::default();
        assert_eq!(resolver.display_hex(CanonicalColor::Red, &["#d00000"], &NullDiagnostics), "#D00000");
        assert_eq!(resolver.display_hex(CanonicalColor::White, &["#FFF"], &NullDiagnostics), "#FFFFFF");
    }

    #[test]
    fn test_display_hex_discards_white_on_colored_shirt() {
        let resolver = PlaceholderResolver::default();
        let diagnostics = CollectingDiagnostics::new();
        let hex = resolver.display_hex(CanonicalColor::NavyBlue, &["#FFFFFF", "#ffffff"], &diagnostics);

        assert_eq!(hex, "#1F2A44");
        assert_eq!(diagnostics.events().len(), 2);
    }

    #[test]
    fn test_display_hex_skips_malformed_then_takes_next() {
        let resolver = PlaceholderResolver::default();
        let hex = resolver.display_hex(CanonicalColor::Black, &["black", "#000000"], &NullDiagnostics);
        assert_eq!(hex, "#000000");
        assert_eq!(resolver.display_hex(CanonicalColor::Black, &[], &NullDiagnostics), "#111111");
    }

    #[test]
    fn test_hex_overrides_from_config() {
        let mut config = GalleryConfig::default();
        config.hex.insert("vermell".to_string(), "#aa0000".to_string());
        let resolver = PlaceholderResolver::from_config(&config);
        assert_eq!(resolver.known_hex(CanonicalColor::Red), "#AA0000");
        assert_eq!(resolver.known_hex(CanonicalColor::Black), "#111111");
    }

    #[test]
    fn test_render_swatch() {
        let resolver = PlaceholderResolver::default();
        let image = render_swatch(&resolver.resolve(CanonicalColor::Red), 4);
        assert_eq!(image.dimensions(), (4, 4));
        assert_eq!(*image.get_pixel(3, 3), Rgba([0xC8, 0x10, 0x2E, 255]));

        let generic = render_swatch(&resolver.generic(), 0);
        assert_eq!(generic.dimensions(), (1, 1));
        assert_eq!(*generic.get_pixel(0, 0), GRAY);
    }
}
