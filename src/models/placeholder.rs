//! Stand-ins for colors without a real photo.

use serde::Serialize;
use std::borrow::Cow;

use crate::color::CanonicalColor;

/// What to render for a canonical color with no backing photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Placeholder {
    /// A static stand-in photo from the per-color table
    Image { color: CanonicalColor, path: String },
    /// A solid swatch with an icon mask drawn over it
    Swatch { color: Option<CanonicalColor>, background_hex: String, icon_mask: String },
}

impl Placeholder {
    /// The asset a renderer fetches for this placeholder.
    pub fn src(&self) -> &str {
        match self {
            Placeholder::Image { path, .. } => path,
            Placeholder::Swatch { icon_mask, .. } => icon_mask,
        }
    }

    /// Key that tells two placeholders apart on screen.
    ///
    /// Swatches share one icon mask, so they are keyed by color instead:
    /// `swatch:<slug>`, or `swatch:generic` for the gray fallback.
    pub fn identity(&self) -> Cow<'_, str> {
        match self {
            Placeholder::Image { path, .. } => Cow::Borrowed(path),
            Placeholder::Swatch { color: Some(color), .. } => Cow::Owned(format!("swatch:{}", color.slug())),
            Placeholder::Swatch { color: None, .. } => Cow::Borrowed("swatch:generic"),
        }
    }

    /// `None` only for the generic gray swatch.
    pub fn color(&self) -> Option<CanonicalColor> {
        match self {
            Placeholder::Image { color, .. } => Some(*color),
            Placeholder::Swatch { color, .. } => *color,
        }
    }

    pub fn is_swatch(&self) -> bool {
        matches!(self, Placeholder::Swatch { .. })
    }
}
