//! Thumbnail grid assembly
//!
//! Produces exactly two rows, light ink first, each a fixed sequence of
//! canonical colors from the configured row order. Every slot is bound to a
//! real photo for (a design with that ink, that color) or to a placeholder.
//! Both rows are always produced so the gallery layout stays stable even
//! when a product only has photos for one ink.
//!
//! Photos are grouped by ink before assembly. Usually a group is a design
//! (`<design>/<color>/<file>`), classified by [`crate::ink`]. Some
//! collections instead keep every shirt photo under a directory named after
//! the shirt base (`<collection>/negre/vermell.png`); there the base
//! directory is the group and fixes the ink directly.

use serde::Serialize;
use std::collections::HashMap;

use crate::color::{lookup_folded, CanonicalColor};
use crate::config::GalleryConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::ink::{classify_designs, DesignCatalog};
use crate::models::{Ink, InkTier, InkVerdict, SlotKey, ThumbnailRow, ThumbnailSlot, Variant};
use crate::path::{parse_image_path, ImagePath};
use crate::placeholder::PlaceholderResolver;

/// How a product's photos are organized on storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetLayout {
    /// `<design>/<color>/<file>`
    DesignFolders,
    /// `<base color>/<file named after the shirt color>`
    BaseColorFolders,
}

/// Photos that share one ink.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InkGroup {
    label: String,
    ink: Ink,
    /// (shirt color, url) in discovery order
    assets: Vec<(CanonicalColor, String)>,
}

impl InkGroup {
    fn photo_for(&self, color: CanonicalColor) -> Option<&str> {
        self.assets.iter().find(|(c, _)| *c == color).map(|(_, url)| url.as_str())
    }
}

/// The assembled gallery model for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailGrid {
    /// Light-ink row, then dark-ink row
    pub rows: [ThumbnailRow; 2],
    /// Flat, deduplicated image list for the main gallery
    pub images: Vec<String>,
    pub layout: AssetLayout,
    /// Ink decision per group, in discovery order
    pub verdicts: Vec<InkVerdict>,
}

impl ThumbnailGrid {
    pub fn row(&self, ink: Ink) -> &ThumbnailRow {
        &self.rows[ink.row_index()]
    }

    /// All slots, light row first.
    pub fn slots(&self) -> impl Iterator<Item = &ThumbnailSlot> {
        self.rows.iter().flat_map(|row| row.slots.iter())
    }

    pub fn slot(&self, key: SlotKey) -> Option<&ThumbnailSlot> {
        self.row(key.ink).slot(key.color)
    }

    /// First slot of the given color that has a real photo.
    pub fn first_photo_slot(&self, color: CanonicalColor) -> Option<&ThumbnailSlot> {
        self.slots().find(|s| s.key.color == color && s.has_photo())
    }

    /// Slot whose photo is `url`.
    pub fn slot_for_image(&self, url: &str) -> Option<&ThumbnailSlot> {
        self.slots().find(|s| s.image.as_deref() == Some(url))
    }

    /// Position of `url` in the flat image list.
    pub fn image_index(&self, url: &str) -> Option<usize> {
        self.images.iter().position(|i| i == url)
    }

    /// Number of slots backed by a real photo.
    pub fn photo_count(&self) -> usize {
        self.rows.iter().map(ThumbnailRow::photo_count).sum()
    }
}

/// Builds a [`ThumbnailGrid`] from valid variants and raw images.
pub struct ThumbnailGridBuilder<'a> {
    config: &'a GalleryConfig,
    placeholders: PlaceholderResolver,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> ThumbnailGridBuilder<'a> {
    pub fn new(config: &'a GalleryConfig, diagnostics: &'a dyn Diagnostics) -> Self {
        Self { config, placeholders: PlaceholderResolver::from_config(config), diagnostics }
    }

    pub fn placeholders(&self) -> &PlaceholderResolver {
        &self.placeholders
    }

    pub fn build(&self, variants: &[Variant], images: &[String]) -> ThumbnailGrid {
        let (layout, groups, verdicts) = match detect_base_color_layout(images) {
            Some(groups) => {
                let labels = groups.iter().map(|g| g.label.clone()).collect();
                self.diagnostics.report(&Diagnostic::BaseColorLayout { groups: labels });
                let verdicts = groups
                    .iter()
                    .map(|g| InkVerdict {
                        design: g.label.clone(),
                        ink: Some(g.ink),
                        tier: Some(InkTier::BaseColorDirectory),
                    })
                    .collect();
                (AssetLayout::BaseColorFolders, groups, verdicts)
            }
            None => {
                let (groups, verdicts) = self.design_groups(variants, images);
                (AssetLayout::DesignFolders, groups, verdicts)
            }
        };

        let mut hex_cache: HashMap<CanonicalColor, String> = HashMap::new();
        let rows = Ink::ROWS.map(|ink| self.assemble_row(ink, &groups, variants, &mut hex_cache));

        let mut flat: Vec<String> = Vec::new();
        let slot_images = rows.iter().flat_map(|r| r.slots.iter()).filter_map(|s| s.image.clone());
        let variant_images = variants.iter().filter_map(|v| v.image.clone());
        for url in slot_images.chain(images.iter().cloned()).chain(variant_images) {
            if !flat.contains(&url) {
                flat.push(url);
            }
        }

        log::debug!(
            "built {:?} grid: {} photo slots, {} images",
            layout,
            rows.iter().map(ThumbnailRow::photo_count).sum::<usize>(),
            flat.len()
        );

        ThumbnailGrid { rows, images: flat, layout, verdicts }
    }

    fn design_groups(&self, variants: &[Variant], images: &[String]) -> (Vec<InkGroup>, Vec<InkVerdict>) {
        let catalog = DesignCatalog::collect(variants, images, self.diagnostics);
        let verdicts = classify_designs(&catalog, self.diagnostics);
        let generic_row = self.config.ink.generic_row;

        let groups = catalog
            .designs()
            .iter()
            .zip(&verdicts)
            .map(|(design, verdict)| {
                let ink = verdict.ink.unwrap_or_else(|| {
                    self.diagnostics.report(&Diagnostic::InkUndetermined {
                        design: design.label.clone(),
                        fallback_row: generic_row,
                    });
                    generic_row
                });
                InkGroup {
                    label: design.label.clone(),
                    ink,
                    assets: design
                        .assets
                        .iter()
                        .filter_map(|a| a.shirt_color.map(|c| (c, a.url.clone())))
                        .collect(),
                }
            })
            .collect();

        (groups, verdicts)
    }

    fn assemble_row(
        &self,
        ink: Ink,
        groups: &[InkGroup],
        variants: &[Variant],
        hex_cache: &mut HashMap<CanonicalColor, String>,
    ) -> ThumbnailRow {
        let slots = self
            .config
            .row_order(ink)
            .into_iter()
            .map(|color| {
                let display_hex = hex_cache
                    .entry(color)
                    .or_insert_with(|| {
                        let reported: Vec<&str> = variants
                            .iter()
                            .filter(|v| v.color == Some(color))
                            .filter_map(|v| v.hex.as_deref())
                            .collect();
                        self.placeholders.display_hex(color, &reported, self.diagnostics)
                    })
                    .clone();

                let photo = groups
                    .iter()
                    .filter(|g| g.ink == ink)
                    .find_map(|g| g.photo_for(color).map(|url| (url.to_string(), g.label.clone())));

                match photo {
                    Some((url, design)) => ThumbnailSlot {
                        key: SlotKey::new(ink, color),
                        image: Some(url),
                        design: Some(design),
                        display_hex,
                        placeholder: None,
                    },
                    None => ThumbnailSlot {
                        key: SlotKey::new(ink, color),
                        image: None,
                        design: None,
                        placeholder: Some(self.placeholders.resolve_with_hex(color, &display_hex)),
                        display_hex,
                    },
                }
            })
            .collect();

        ThumbnailRow { ink, slots }
    }
}

/// First canonical color named in a token list (two-word names first).
fn color_in_tokens(tokens: &[String]) -> Option<CanonicalColor> {
    for i in 0..tokens.len() {
        if i + 1 < tokens.len() {
            if let Some(color) = lookup_folded(&format!("{} {}", tokens[i], tokens[i + 1])) {
                return Some(color);
            }
        }
        if let Some(color) = lookup_folded(&tokens[i]) {
            return Some(color);
        }
    }
    None
}

/// Detect the base-color directory layout.
///
/// Matches when every image sits directly in a directory named after a shirt
/// base color (White or Black), every file name names a shirt color, and at
/// least one file's color differs from its directory, which is what tells
/// this layout apart from design folders whose files repeat the color.
fn detect_base_color_layout(images: &[String]) -> Option<Vec<InkGroup>> {
    if images.is_empty() {
        return None;
    }

    let mut entries: Vec<(ImagePath, CanonicalColor, CanonicalColor)> = Vec::new();
    for url in images {
        let parsed = parse_image_path(url)?;
        let base = parsed.shirt_color().filter(|c| c.is_base())?;
        let shirt = color_in_tokens(&parsed.file_tokens())?;
        entries.push((parsed, base, shirt));
    }

    if entries.iter().all(|(_, base, shirt)| base == shirt) {
        return None;
    }

    let mut groups: Vec<InkGroup> = Vec::new();
    for (parsed, base, shirt) in entries {
        let ink = Ink::visible_on(base.shirt_tone());
        let index = match groups.iter().position(|g| g.ink == ink) {
            Some(index) => index,
            None => {
                groups.push(InkGroup { label: parsed.color_segment.clone(), ink, assets: Vec::new() });
                groups.len() - 1
            }
        };
        if !groups[index].assets.iter().any(|(_, url)| *url == parsed.url) {
            groups[index].assets.push((shirt, parsed.url));
        }
    }

    Some(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingDiagnostics, NullDiagnostics};
    use crate::models::{valid_variants, Placeholder, Product, RawVariant};

    fn build(product: &Product) -> ThumbnailGrid {
        let config = GalleryConfig::default();
        let variants = valid_variants(product, &NullDiagnostics);
        ThumbnailGridBuilder::new(&config, &NullDiagnostics).build(&variants, &product.images)
    }

    fn product(images: &[&str], variants: Vec<RawVariant>) -> Product {
        Product {
            id: "p".to_string(),
            name: "Tee".to_string(),
            images: images.iter().map(|s| s.to_string()).collect(),
            variants,
            ..Default::default()
        }
    }

    #[test]
    fn test_two_rows_of_six_with_no_assets() {
        let grid = build(&product(&[], vec![]));
        assert_eq!(grid.rows.len(), 2);
        assert!(grid.rows.iter().all(|r| r.slots.len() == 6));
        assert_eq!(grid.photo_count(), 0);
        assert!(grid.slots().all(|s| s.placeholder.is_some()));
        assert!(grid.images.is_empty());
    }

    #[test]
    fn test_single_ink_product_gets_placeholder_second_row() {
        let grid = build(&product(
            &["/Cosmos/Wormhole/negre/a.png", "/Cosmos/Wormhole/vermell/b.png"],
            vec![RawVariant::new("M", "Negre"), RawVariant::new("M", "Vermell")],
        ));

        let light = grid.row(Ink::Light);
        assert_eq!(light.slots[0].key.color, CanonicalColor::Black);
        assert_eq!(light.slots[0].image.as_deref(), Some("/Cosmos/Wormhole/negre/a.png"));
        assert_eq!(light.slot(CanonicalColor::Red).unwrap().image.as_deref(), Some("/Cosmos/Wormhole/vermell/b.png"));
        assert_eq!(light.photo_count(), 2);
        assert_eq!(grid.row(Ink::Dark).photo_count(), 0);
        assert_eq!(grid.row(Ink::Dark).slots[0].key.color, CanonicalColor::White);
    }

    #[test]
    fn test_two_designs_fill_their_own_rows() {
        let grid = build(&product(
            &[
                "/Cosmos/Wormhole/negre/a.png",
                "/Cosmos/Wormhole/blau-royal/b.png",
                "/Cosmos/Orbit/blanc/c.png",
                "/Cosmos/Orbit/gris/d.png",
            ],
            vec![],
        ));

        assert_eq!(grid.row(Ink::Light).photo_count(), 2);
        assert_eq!(grid.row(Ink::Dark).photo_count(), 2);
        let white = grid.slot(SlotKey::new(Ink::Dark, CanonicalColor::White)).unwrap();
        assert_eq!(white.design.as_deref(), Some("Orbit"));
    }

    #[test]
    fn test_flat_images_order_and_dedup() {
        let grid = build(&product(
            &[
                "/Cosmos/Orbit/blanc/c.png",
                "/Cosmos/lifestyle.jpg",
                "/Cosmos/Wormhole/negre/a.png",
                "/Cosmos/Wormhole/negre/a.png",
            ],
            vec![],
        ));

        assert_eq!(
            grid.images,
            vec!["/Cosmos/Wormhole/negre/a.png", "/Cosmos/Orbit/blanc/c.png", "/Cosmos/lifestyle.jpg"]
        );
        assert_eq!(grid.image_index("/Cosmos/lifestyle.jpg"), Some(2));
    }

    #[test]
    fn test_undetermined_design_goes_to_generic_row() {
        let diagnostics = CollectingDiagnostics::new();
        let config = GalleryConfig::default();
        let p = product(&["/Cosmos/Wormhole/negre/a.png", "/Cosmos/Wormhole/blanc/b.png"], vec![]);
        let variants = valid_variants(&p, &NullDiagnostics);
        let grid = ThumbnailGridBuilder::new(&config, &diagnostics).build(&variants, &p.images);

        assert_eq!(grid.verdicts[0].ink, None);
        assert_eq!(grid.row(Ink::Light).slots[0].image.as_deref(), Some("/Cosmos/Wormhole/negre/a.png"));
        assert!(diagnostics
            .events()
            .iter()
            .any(|d| matches!(d, Diagnostic::InkUndetermined { fallback_row: Ink::Light, .. })));
    }

    #[test]
    fn test_variant_hex_feeds_display_hex() {
        let grid = build(&product(
            &[],
            vec![
                RawVariant::new("M", "Vermell").with_hex("#FFFFFF"),
                RawVariant::new("L", "Vermell").with_hex("#b00020"),
                RawVariant::new("M", "Blau Mari").with_hex("#ffffff"),
            ],
        ));

        let red = grid.slot(SlotKey::new(Ink::Light, CanonicalColor::Red)).unwrap();
        assert_eq!(red.display_hex, "#B00020");
        let navy = grid.slot(SlotKey::new(Ink::Light, CanonicalColor::NavyBlue)).unwrap();
        assert_eq!(navy.display_hex, "#1F2A44");
    }

    #[test]
    fn test_placeholder_slots_carry_resolved_placeholder() {
        let grid = build(&product(&[], vec![]));
        let forest = grid.slot(SlotKey::new(Ink::Light, CanonicalColor::ForestGreen)).unwrap();
        assert!(matches!(forest.placeholder, Some(Placeholder::Swatch { .. })));
        let black = grid.slot(SlotKey::new(Ink::Light, CanonicalColor::Black)).unwrap();
        assert_eq!(black.src(), Some("placeholders/tee-black.png"));
    }

    #[test]
    fn test_base_color_directory_layout() {
        let diagnostics = CollectingDiagnostics::new();
        let config = GalleryConfig::default();
        let images: Vec<String> = [
            "/Basics/Logo/negre/negre.png",
            "/Basics/Logo/negre/vermell.png",
            "/Basics/Logo/negre/blau-mari.png",
            "/Basics/Logo/blanc/blanc.png",
            "/Basics/Logo/blanc/gris.png",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let grid = ThumbnailGridBuilder::new(&config, &diagnostics).build(&[], &images);

        assert_eq!(grid.layout, AssetLayout::BaseColorFolders);
        assert_eq!(grid.verdicts.len(), 2);
        assert_eq!(grid.verdicts[0].design, "negre");
        assert_eq!(grid.verdicts[0].tier, Some(InkTier::BaseColorDirectory));

        let light = grid.row(Ink::Light);
        assert_eq!(light.slot(CanonicalColor::Red).unwrap().image.as_deref(), Some("/Basics/Logo/negre/vermell.png"));
        assert_eq!(light.slot(CanonicalColor::NavyBlue).unwrap().image.as_deref(), Some("/Basics/Logo/negre/blau-mari.png"));
        let dark = grid.row(Ink::Dark);
        assert_eq!(dark.slot(CanonicalColor::HeatherGrey).unwrap().image.as_deref(), Some("/Basics/Logo/blanc/gris.png"));
        assert!(matches!(diagnostics.events()[0], Diagnostic::BaseColorLayout { .. }));
    }

    #[test]
    fn test_design_folders_repeating_color_are_not_base_layout() {
        let grid = build(&product(
            &["/Cosmos/Wormhole/negre/wormhole-negre.png", "/Cosmos/Wormhole/blanc/wormhole-blanc.png"],
            vec![],
        ));
        assert_eq!(grid.layout, AssetLayout::DesignFolders);
    }
}
