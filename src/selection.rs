//! Selection state sync
//!
//! Keeps the selected (size, color) pointing at what the user meant. Color
//! intent outranks size continuity, and a color that has no variant at all
//! is kept as a pin so a placeholder can stand in for it. A color the user
//! did not ask for is never substituted.

use serde::Serialize;

use crate::color::CanonicalColor;
use crate::models::{available_sizes, has_variant, sizes_for_color, SlotKey, Variant};

/// What a selection is pinned to beyond its plain color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum SlotPin {
    /// A specific thumbnail slot the user clicked
    Slot(SlotKey),
    /// A color with no purchasable variant, kept so its placeholder renders
    Color(CanonicalColor),
}

impl SlotPin {
    pub fn color(&self) -> CanonicalColor {
        match self {
            SlotPin::Slot(key) => key.color,
            SlotPin::Color(color) => *color,
        }
    }
}

/// The user's current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub size: Option<String>,
    pub color: Option<CanonicalColor>,
    pub pin: Option<SlotPin>,
}

/// Result of a color selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorChange {
    /// A variant exists at the current size
    Exact,
    /// The color only exists at other sizes; switched to `to`
    AdoptedSize { from: Option<String>, to: String },
    /// No variant has this color; it is pinned for a placeholder
    Pinned,
}

/// Result of a size selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeChange {
    /// No color selected, or the color exists at the new size
    Exact,
    /// The color is kept; it can be bought at these sizes instead
    ColorAtOtherSizes(Vec<String>),
    /// The color has no variant at any size and is kept as a pin
    ColorPinned(CanonicalColor),
}

impl SelectionState {
    /// Fresh state for a newly shown product: first available size, no color.
    pub fn for_product(variants: &[Variant]) -> Self {
        Self { size: available_sizes(variants).into_iter().next(), color: None, pin: None }
    }

    /// Reset to the state of a newly shown product.
    pub fn on_product_change(&mut self, variants: &[Variant]) {
        *self = Self::for_product(variants);
    }

    /// Apply an explicit color choice.
    pub fn select_color(&mut self, variants: &[Variant], color: CanonicalColor) -> ColorChange {
        if self.pin.is_some_and(|p| p.color() != color) {
            self.pin = None;
        }
        self.color = Some(color);

        if has_variant(variants, self.size.as_deref(), color) {
            if matches!(self.pin, Some(SlotPin::Color(_))) {
                self.pin = None;
            }
            return ColorChange::Exact;
        }

        match sizes_for_color(variants, color).into_iter().next() {
            Some(size) => {
                let from = self.size.replace(size.clone());
                log::debug!("color {} not sold at {:?}, switching to size {}", color, from, size);
                if matches!(self.pin, Some(SlotPin::Color(_))) {
                    self.pin = None;
                }
                ColorChange::AdoptedSize { from, to: size }
            }
            None => {
                if !matches!(self.pin, Some(SlotPin::Slot(_))) {
                    self.pin = Some(SlotPin::Color(color));
                }
                ColorChange::Pinned
            }
        }
    }

    /// Pin a clicked thumbnail slot and select its color.
    pub fn select_slot(&mut self, variants: &[Variant], key: SlotKey) -> ColorChange {
        let change = self.select_color(variants, key.color);
        self.pin = Some(SlotPin::Slot(key));
        change
    }

    /// Apply a size choice without ever dropping the selected color.
    pub fn select_size(&mut self, variants: &[Variant], size: &str) -> SizeChange {
        self.size = Some(size.to_string());

        let Some(color) = self.color else {
            return SizeChange::Exact;
        };
        if has_variant(variants, Some(size), color) {
            return SizeChange::Exact;
        }

        let elsewhere = sizes_for_color(variants, color);
        if elsewhere.is_empty() {
            if !matches!(self.pin, Some(SlotPin::Slot(key)) if key.color == color) {
                self.pin = Some(SlotPin::Color(color));
            }
            SizeChange::ColorPinned(color)
        } else {
            SizeChange::ColorAtOtherSizes(elsewhere)
        }
    }

    /// The slot the user pinned, if any.
    pub fn pinned_slot(&self) -> Option<SlotKey> {
        match self.pin {
            Some(SlotPin::Slot(key)) => Some(key),
            _ => None,
        }
    }
}
