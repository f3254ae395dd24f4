//! Thumbnail grid slots.

use serde::Serialize;
use std::fmt;

use super::ink::Ink;
use super::placeholder::Placeholder;
use crate::color::{normalize_color, CanonicalColor};

/// Stable identity of a slot: its row ink and its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SlotKey {
    pub ink: Ink,
    pub color: CanonicalColor,
}

impl SlotKey {
    pub fn new(ink: Ink, color: CanonicalColor) -> Self {
        Self { ink, color }
    }

    /// Parse the `ink/color` form produced by `Display`.
    ///
    /// The color half accepts any recognized color token.
    pub fn parse(s: &str) -> Option<Self> {
        let (ink, color) = s.split_once('/')?;
        let ink = match ink.trim().to_lowercase().as_str() {
            "light" => Ink::Light,
            "dark" => Ink::Dark,
            _ => return None,
        };
        Some(Self { ink, color: normalize_color(color)? })
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ink, self.color.slug())
    }
}

/// One fixed position in a thumbnail row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailSlot {
    pub key: SlotKey,
    /// Real photo for this (ink, color), if any
    pub image: Option<String>,
    /// Design the photo belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
    pub display_hex: String,
    /// Present exactly when `image` is `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Placeholder>,
}

impl ThumbnailSlot {
    pub fn color(&self) -> CanonicalColor {
        self.key.color
    }

    pub fn row_ink(&self) -> Ink {
        self.key.ink
    }

    pub fn has_photo(&self) -> bool {
        self.image.is_some()
    }

    /// What the slot renders: the photo, else the placeholder asset.
    pub fn src(&self) -> Option<&str> {
        self.image.as_deref().or_else(|| self.placeholder.as_ref().map(Placeholder::src))
    }
}

/// A full row of slots for one ink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailRow {
    pub ink: Ink,
    pub slots: Vec<ThumbnailSlot>,
}

impl ThumbnailRow {
    pub fn slot(&self, color: CanonicalColor) -> Option<&ThumbnailSlot> {
        self.slots.iter().find(|s| s.key.color == color)
    }

    pub fn photo_count(&self) -> usize {
        self.slots.iter().filter(|s| s.has_photo()).count()
    }
}
