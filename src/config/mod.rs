//! Configuration module for gallery resolution
//!
//! Provides types and parsing for `gallery.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
