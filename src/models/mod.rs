//! Data models for catalog products and the derived gallery presentation

mod ink;
mod placeholder;
mod product;
mod slot;

// Re-export all public types
pub use ink::{Ink, InkTier, InkVerdict};
pub use placeholder::Placeholder;
pub use product::{
    available_sizes, has_variant, load_product, parse_product, purchasable_colors, sizes_for_color,
    valid_variants, Product, ProductError, RawVariant, Variant,
};
pub use slot::{SlotKey, ThumbnailRow, ThumbnailSlot};
