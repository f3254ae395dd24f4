//! Product gallery facade
//!
//! Owns everything derived for one product view: valid variants, the
//! thumbnail grid, the user's selection, the main image override and the
//! transition controller. Event handlers mutate the selection and then
//! re-resolve the main image.

use serde::Serialize;
use std::sync::Arc;

use crate::color::{normalize_color, CanonicalColor};
use crate::config::GalleryConfig;
use crate::diagnostics::{Diagnostic, Diagnostics, LogDiagnostics};
use crate::grid::{AssetLayout, ThumbnailGrid, ThumbnailGridBuilder};
use crate::main_image::{ImageOverride, MainImageChoice, MainImageResolver};
use crate::models::{
    available_sizes, purchasable_colors, valid_variants, InkVerdict, Product, SlotKey, ThumbnailRow,
    Variant,
};
use crate::placeholder::PlaceholderResolver;
use crate::selection::{ColorChange, SelectionState, SizeChange};
use crate::transition::{ChangeKind, Completion, ImageTransitionController, LoadError, LoadTicket, LoadToken};

/// Serializable view of a gallery.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GallerySnapshot<'a> {
    pub product_id: &'a str,
    pub layout: AssetLayout,
    pub images: &'a [String],
    pub thumbnail_rows: Option<&'a [ThumbnailRow; 2]>,
    pub verdicts: &'a [InkVerdict],
    pub selection: &'a SelectionState,
    pub available_sizes: Vec<String>,
    pub purchasable_colors: Vec<CanonicalColor>,
    pub main_image: MainImageChoice,
}

/// Gallery state for one product.
pub struct Gallery {
    product: Product,
    config: GalleryConfig,
    diagnostics: Arc<dyn Diagnostics>,
    placeholders: PlaceholderResolver,
    variants: Vec<Variant>,
    grid: ThumbnailGrid,
    selection: SelectionState,
    image_override: ImageOverride,
    current_index: Option<usize>,
    transition: ImageTransitionController,
    prefetch_queue: Vec<String>,
}

impl Gallery {
    /// Gallery with default configuration, logging diagnostics.
    pub fn new(product: Product) -> Self {
        Self::with_config(product, GalleryConfig::default(), Arc::new(LogDiagnostics))
    }

    pub fn with_config(product: Product, config: GalleryConfig, diagnostics: Arc<dyn Diagnostics>) -> Self {
        let placeholders = PlaceholderResolver::from_config(&config);
        let transition = ImageTransitionController::new(&config.transition);
        let variants = valid_variants(&product, diagnostics.as_ref());
        let grid = ThumbnailGridBuilder::new(&config, diagnostics.as_ref()).build(&variants, &product.images);
        let selection = SelectionState::for_product(&variants);

        let mut gallery = Self {
            product,
            config,
            diagnostics,
            placeholders,
            variants,
            grid,
            selection,
            image_override: ImageOverride::Natural,
            current_index: None,
            transition,
            prefetch_queue: Vec::new(),
        };
        gallery.show_initial();
        gallery
    }

    fn show_initial(&mut self) {
        let choice = self.resolve_main_image();
        self.current_index = choice.index;
        self.transition.show(&choice.image.identity());
    }

    /// Switch to another product, rebuilding everything derived from it.
    pub fn on_product_change(&mut self, product: Product) {
        self.variants = valid_variants(&product, self.diagnostics.as_ref());
        self.grid = ThumbnailGridBuilder::new(&self.config, self.diagnostics.as_ref())
            .build(&self.variants, &product.images);
        self.product = product;
        self.selection.on_product_change(&self.variants);
        self.image_override = ImageOverride::Natural;
        self.current_index = None;
        self.transition.reset();
        self.prefetch_queue.clear();
        self.show_initial();
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn grid(&self) -> &ThumbnailGrid {
        &self.grid
    }

    /// Flat, deduplicated image list.
    pub fn images(&self) -> &[String] {
        &self.grid.images
    }

    /// Both thumbnail rows, or `None` for products without any color
    /// semantics, which fall back to a flat grid over [`Gallery::images`].
    pub fn thumbnail_rows(&self) -> Option<&[ThumbnailRow; 2]> {
        let has_color = self.variants.iter().any(|v| v.color.is_some()) || self.grid.photo_count() > 0;
        has_color.then_some(&self.grid.rows)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn image_override(&self) -> &ImageOverride {
        &self.image_override
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn resolve_main_image(&self) -> MainImageChoice {
        MainImageResolver::new(&self.grid, &self.placeholders).resolve(
            &self.selection,
            &self.image_override,
            self.current_index,
        )
    }

    /// Apply a color chosen by name. Unrecognized names change nothing.
    pub fn on_color_select(&mut self, token: &str) -> Option<ColorChange> {
        match normalize_color(token) {
            Some(color) => Some(self.select_color(color)),
            None => {
                self.diagnostics.report(&Diagnostic::UnrecognizedColor {
                    token: token.to_string(),
                    context: "color selection".to_string(),
                });
                None
            }
        }
    }

    pub fn select_color(&mut self, color: CanonicalColor) -> ColorChange {
        let previous = self.selection.color;
        let change = self.selection.select_color(&self.variants, color);
        self.image_override.on_color_change(Some(color));
        self.refresh_main_image(change_kind(previous, color));
        change
    }

    /// Apply a click on a thumbnail slot.
    ///
    /// A photo slot pins that photo. A placeholder slot forces its
    /// placeholder as the main image until another color is chosen.
    pub fn on_slot_select(&mut self, key: SlotKey) -> Option<ColorChange> {
        let slot = self.grid.slot(key)?.clone();
        let previous = self.selection.color;

        let change = self.selection.select_slot(&self.variants, key);
        self.image_override.on_color_change(Some(key.color));
        match (&slot.image, slot.placeholder) {
            (Some(url), _) => {
                self.image_override = ImageOverride::Natural;
                self.current_index = self.grid.image_index(url);
            }
            (None, Some(placeholder)) => {
                self.image_override = ImageOverride::Forced { color: key.color, placeholder };
            }
            (None, None) => {}
        }

        self.refresh_main_image(change_kind(previous, key.color));
        Some(change)
    }

    pub fn on_size_select(&mut self, size: &str) -> SizeChange {
        let change = self.selection.select_size(&self.variants, size);
        self.refresh_main_image(ChangeKind::InkToggle);
        change
    }

    /// Colors purchasable at the selected size.
    pub fn purchasable_colors(&self) -> Vec<CanonicalColor> {
        match self.selection.size.as_deref() {
            Some(size) => purchasable_colors(&self.variants, size),
            None => Vec::new(),
        }
    }

    pub fn available_sizes(&self) -> Vec<String> {
        available_sizes(&self.variants)
    }

    /// The main-image load waiting to be performed, if any.
    pub fn pending_load(&self) -> Option<&LoadTicket> {
        self.transition.pending()
    }

    /// Report a finished main-image load.
    pub fn complete_load(&mut self, token: LoadToken, result: Result<(), LoadError>) -> Completion {
        self.transition.complete(token, result)
    }

    pub fn transition(&self) -> &ImageTransitionController {
        &self.transition
    }

    /// Advance the crossfade by `dt_ms`.
    pub fn tick(&mut self, dt_ms: u32) -> Option<f32> {
        self.transition.tick(dt_ms)
    }

    /// Identity of the image on screen: its URL, or `swatch:<slug>` for a
    /// synthesized swatch.
    pub fn displayed_image(&self) -> Option<&str> {
        self.transition.displayed()
    }

    /// Photos of the selected color to preload, each handed out once per
    /// product view.
    pub fn take_prefetch(&mut self) -> Vec<String> {
        std::mem::take(&mut self.prefetch_queue)
    }

    pub fn snapshot(&self) -> GallerySnapshot<'_> {
        GallerySnapshot {
            product_id: &self.product.id,
            layout: self.grid.layout,
            images: self.images(),
            thumbnail_rows: self.thumbnail_rows(),
            verdicts: &self.grid.verdicts,
            selection: &self.selection,
            available_sizes: self.available_sizes(),
            purchasable_colors: self.purchasable_colors(),
            main_image: self.resolve_main_image(),
        }
    }

    fn refresh_main_image(&mut self, kind: ChangeKind) {
        let choice = self.resolve_main_image();
        if choice.index.is_some() {
            self.current_index = choice.index;
        }

        if let Some(ticket) = self.transition.request(&choice.image.identity(), kind) {
            log::debug!("main image -> {} (token {}, {:?})", ticket.target, ticket.token, choice.rule);
        }

        // The main target is already recorded by the request above
        if let Some(color) = self.selection.color {
            let photos = self
                .grid
                .slots()
                .filter(|s| s.key.color == color)
                .filter_map(|s| s.image.as_deref());
            let warmed = self.transition.prefetch().warm(photos);
            if !warmed.is_empty() {
                log::debug!("prefetching {} image(s) for {}", warmed.len(), color);
                self.prefetch_queue.extend(warmed);
            }
        }
    }
}

fn change_kind(previous: Option<CanonicalColor>, next: CanonicalColor) -> ChangeKind {
    if previous == Some(next) {
        ChangeKind::InkToggle
    } else {
        ChangeKind::ColorChange
    }
}
