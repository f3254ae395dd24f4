//! Main image resolution
//!
//! Picks the single image shown large in the gallery. Rules, first match wins:
//!
//! 1. a forced placeholder, until the color changes to a different color
//! 2. the current image, if it already belongs to a slot of the selected color
//! 3. the photo of the pinned slot
//! 4. the first slot of the selected color that has a photo
//! 5. the placeholder for the selected color
//! 6. the image at the current index, else the first image
//!
//! With nothing at all to show, the generic placeholder is used.

use serde::Serialize;
use std::borrow::Cow;

use crate::color::CanonicalColor;
use crate::grid::ThumbnailGrid;
use crate::models::Placeholder;
use crate::placeholder::PlaceholderResolver;
use crate::selection::SelectionState;

/// Whether a placeholder was forced by clicking an empty slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ImageOverride {
    #[default]
    Natural,
    Forced { color: CanonicalColor, placeholder: Placeholder },
}

impl ImageOverride {
    /// Drop a forced placeholder once a different color is selected.
    pub fn on_color_change(&mut self, color: Option<CanonicalColor>) {
        if let ImageOverride::Forced { color: forced, .. } = self {
            if Some(*forced) != color {
                log::debug!("forced {} placeholder released", forced);
                *self = ImageOverride::Natural;
            }
        }
    }

    pub fn is_forced(&self) -> bool {
        matches!(self, ImageOverride::Forced { .. })
    }
}

/// The resolved main image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MainImage {
    /// A real photo from a thumbnail slot
    Asset { url: String },
    /// A stand-in for a color without a photo
    Placeholder { placeholder: Placeholder },
    /// A raw image picked by position
    Legacy { url: String },
}

impl MainImage {
    pub fn src(&self) -> &str {
        match self {
            MainImage::Asset { url } | MainImage::Legacy { url } => url,
            MainImage::Placeholder { placeholder } => placeholder.src(),
        }
    }

    /// What the transition controller tracks: the URL for photos, a
    /// per-color key for swatches.
    pub fn identity(&self) -> Cow<'_, str> {
        match self {
            MainImage::Asset { url } | MainImage::Legacy { url } => Cow::Borrowed(url),
            MainImage::Placeholder { placeholder } => placeholder.identity(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, MainImage::Placeholder { .. })
    }
}

/// Which rule produced a [`MainImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionRule {
    Forced,
    KeptIndex,
    PinnedSlot,
    FirstSlot,
    ColorPlaceholder,
    Legacy,
    Generic,
}

/// A resolved main image with its index in the flat image list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainImageChoice {
    pub image: MainImage,
    /// Position in the flat list, when the image is part of it
    pub index: Option<usize>,
    pub rule: ResolutionRule,
}

/// Resolves the main image against one built grid.
pub struct MainImageResolver<'a> {
    grid: &'a ThumbnailGrid,
    placeholders: &'a PlaceholderResolver,
}

impl<'a> MainImageResolver<'a> {
    pub fn new(grid: &'a ThumbnailGrid, placeholders: &'a PlaceholderResolver) -> Self {
        Self { grid, placeholders }
    }

    pub fn resolve(
        &self,
        state: &SelectionState,
        image_override: &ImageOverride,
        current_index: Option<usize>,
    ) -> MainImageChoice {
        let images = &self.grid.images;
        let current = current_index.and_then(|i| images.get(i).map(|url| (i, url)));

        if let ImageOverride::Forced { color, placeholder } = image_override {
            if state.color == Some(*color) {
                return MainImageChoice {
                    image: MainImage::Placeholder { placeholder: placeholder.clone() },
                    index: None,
                    rule: ResolutionRule::Forced,
                };
            }
        }

        if let Some(color) = state.color {
            if let Some((index, url)) = current {
                if self.grid.slot_for_image(url).is_some_and(|s| s.key.color == color) {
                    return self.asset(url, index, ResolutionRule::KeptIndex);
                }
            }

            let pinned = state
                .pinned_slot()
                .filter(|key| key.color == color)
                .and_then(|key| self.grid.slot(key))
                .and_then(|slot| slot.image.as_deref());
            if let Some(url) = pinned {
                return self.asset_by_url(url, ResolutionRule::PinnedSlot);
            }

            if let Some(url) = self.grid.first_photo_slot(color).and_then(|s| s.image.as_deref()) {
                return self.asset_by_url(url, ResolutionRule::FirstSlot);
            }

            let placeholder = self
                .grid
                .slots()
                .find(|s| s.key.color == color)
                .and_then(|s| s.placeholder.clone())
                .unwrap_or_else(|| self.placeholders.resolve(color));
            return MainImageChoice {
                image: MainImage::Placeholder { placeholder },
                index: None,
                rule: ResolutionRule::ColorPlaceholder,
            };
        }

        match current.or_else(|| images.first().map(|url| (0, url))) {
            Some((index, url)) => MainImageChoice {
                image: MainImage::Legacy { url: url.clone() },
                index: Some(index),
                rule: ResolutionRule::Legacy,
            },
            None => MainImageChoice {
                image: MainImage::Placeholder { placeholder: self.placeholders.generic() },
                index: None,
                rule: ResolutionRule::Generic,
            },
        }
    }

    fn asset(&self, url: &str, index: usize, rule: ResolutionRule) -> MainImageChoice {
        MainImageChoice { image: MainImage::Asset { url: url.to_string() }, index: Some(index), rule }
    }

    fn asset_by_url(&self, url: &str, rule: ResolutionRule) -> MainImageChoice {
        MainImageChoice {
            image: MainImage::Asset { url: url.to_string() },
            index: self.grid.image_index(url),
            rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GalleryConfig;
    use crate::diagnostics::NullDiagnostics;
    use crate::grid::ThumbnailGridBuilder;
    use crate::models::{Ink, SlotKey};
    use crate::selection::SlotPin;

    fn grid(images: &[&str]) -> ThumbnailGrid {
        let config = GalleryConfig::default();
        let images: Vec<String> = images.iter().map(|s| s.to_string()).collect();
        ThumbnailGridBuilder::new(&config, &NullDiagnostics).build(&[], &images)
    }

    fn two_design_grid() -> ThumbnailGrid {
        grid(&[
            "/C/Wormhole/negre/a.png",
            "/C/Wormhole/vermell/b.png",
            "/C/Orbit/blanc/c.png",
            "/C/Orbit/vermell/d.png",
        ])
    }

    fn state(color: Option<CanonicalColor>) -> SelectionState {
        SelectionState { size: Some("M".to_string()), color, pin: None }
    }

    #[test]
    fn test_forced_placeholder_wins_for_its_color() {
        let g = two_design_grid();
        let resolver = PlaceholderResolver::default();
        let placeholder = resolver.resolve(CanonicalColor::Red);
        let forced = ImageOverride::Forced { color: CanonicalColor::Red, placeholder: placeholder.clone() };

        let choice = MainImageResolver::new(&g, &resolver).resolve(&state(Some(CanonicalColor::Red)), &forced, Some(0));
        assert_eq!(choice.rule, ResolutionRule::Forced);
        assert_eq!(choice.image, MainImage::Placeholder { placeholder });
    }

    #[test]
    fn test_override_released_only_on_different_color() {
        let resolver = PlaceholderResolver::default();
        let mut forced = ImageOverride::Forced {
            color: CanonicalColor::Red,
            placeholder: resolver.resolve(CanonicalColor::Red),
        };
        forced.on_color_change(Some(CanonicalColor::Red));
        assert!(forced.is_forced());
        forced.on_color_change(Some(CanonicalColor::Black));
        assert_eq!(forced, ImageOverride::Natural);
    }

    #[test]
    fn test_keeps_current_index_of_matching_color() {
        let g = two_design_grid();
        let resolver = PlaceholderResolver::default();
        let index = g.image_index("/C/Orbit/vermell/d.png");

        let choice = MainImageResolver::new(&g, &resolver).resolve(
            &state(Some(CanonicalColor::Red)),
            &ImageOverride::Natural,
            index,
        );
        assert_eq!(choice.rule, ResolutionRule::KeptIndex);
        assert_eq!(choice.image.src(), "/C/Orbit/vermell/d.png");
        assert_eq!(choice.index, index);
    }

    #[test]
    fn test_first_matching_slot_when_index_is_other_color() {
        let g = two_design_grid();
        let resolver = PlaceholderResolver::default();

        let choice = MainImageResolver::new(&g, &resolver).resolve(
            &state(Some(CanonicalColor::Red)),
            &ImageOverride::Natural,
            Some(0),
        );
        assert_eq!(choice.rule, ResolutionRule::FirstSlot);
        assert_eq!(choice.image.src(), "/C/Wormhole/vermell/b.png");
        assert_eq!(choice.index, g.image_index("/C/Wormhole/vermell/b.png"));
    }

    #[test]
    fn test_pinned_slot_beats_first_slot() {
        let g = two_design_grid();
        let resolver = PlaceholderResolver::default();
        let mut s = state(Some(CanonicalColor::Red));
        s.pin = Some(SlotPin::Slot(SlotKey::new(Ink::Dark, CanonicalColor::Red)));

        let choice = MainImageResolver::new(&g, &resolver).resolve(&s, &ImageOverride::Natural, None);
        assert_eq!(choice.rule, ResolutionRule::PinnedSlot);
        assert_eq!(choice.image.src(), "/C/Orbit/vermell/d.png");
    }

    #[test]
    fn test_placeholder_for_color_without_photo() {
        let g = two_design_grid();
        let resolver = PlaceholderResolver::default();

        let choice = MainImageResolver::new(&g, &resolver).resolve(
            &state(Some(CanonicalColor::ForestGreen)),
            &ImageOverride::Natural,
            Some(0),
        );
        assert_eq!(choice.rule, ResolutionRule::ColorPlaceholder);
        assert!(choice.image.is_placeholder());
        assert_eq!(choice.image.src(), "placeholders/tee-mask.svg");
        assert_eq!(choice.index, None);
    }

    #[test]
    fn test_no_color_falls_back_to_index_then_first() {
        let g = two_design_grid();
        let resolver = PlaceholderResolver::default();
        let r = MainImageResolver::new(&g, &resolver);

        let at_index = r.resolve(&state(None), &ImageOverride::Natural, Some(2));
        assert_eq!(at_index.rule, ResolutionRule::Legacy);
        assert_eq!(at_index.image.src(), g.images[2]);

        let out_of_range = r.resolve(&state(None), &ImageOverride::Natural, Some(99));
        assert_eq!(out_of_range.index, Some(0));
        assert_eq!(out_of_range.image.src(), g.images[0]);
    }

    #[test]
    fn test_generic_placeholder_when_nothing_exists() {
        let g = grid(&[]);
        let resolver = PlaceholderResolver::default();
        let choice = MainImageResolver::new(&g, &resolver).resolve(&state(None), &ImageOverride::Natural, None);
        assert_eq!(choice.rule, ResolutionRule::Generic);
        assert_eq!(choice.image.src(), "placeholders/generic-mask.svg");
    }
}
