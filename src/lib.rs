//! inkgrid - color, ink and thumbnail resolution for print-on-demand galleries
//!
//! This library provides functionality to:
//! - Normalize loose color tokens to a closed set of shirt colors
//! - Classify each design's print ink from asset paths and variants
//! - Build the two-row thumbnail grid with placeholders for missing photos
//! - Keep the size/color selection and main image consistent
//! - Guard main image swaps against stale async loads

pub mod cli;
pub mod color;
pub mod config;
pub mod diagnostics;
pub mod gallery;
pub mod grid;
pub mod ink;
pub mod main_image;
pub mod models;
pub mod path;
pub mod placeholder;
pub mod selection;
pub mod suggest;
pub mod transition;

pub use color::{normalize_color, CanonicalColor};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use gallery::Gallery;
pub use models::{Ink, Product, RawVariant};
