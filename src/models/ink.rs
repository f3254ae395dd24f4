//! Print ink classification types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::ShirtTone;

/// Whether a design's print is light-colored or dark-colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ink {
    /// Light print, shown on dark shirts
    Light,
    /// Dark print, shown on light shirts
    Dark,
}

impl Ink {
    /// Row order of the thumbnail grid.
    pub const ROWS: [Ink; 2] = [Ink::Light, Ink::Dark];

    pub fn complement(self) -> Ink {
        match self {
            Ink::Light => Ink::Dark,
            Ink::Dark => Ink::Light,
        }
    }

    /// The ink that is visible on a shirt of the given tone.
    pub fn visible_on(tone: ShirtTone) -> Ink {
        match tone {
            ShirtTone::Dark => Ink::Light,
            ShirtTone::Light => Ink::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Ink::Light => "light",
            Ink::Dark => "dark",
        }
    }

    /// Index of this ink's row in the grid.
    pub fn row_index(self) -> usize {
        match self {
            Ink::Light => 0,
            Ink::Dark => 1,
        }
    }
}

impl fmt::Display for Ink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which classification tier decided a design's ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InkTier {
    ShirtAvailability,
    DesignName,
    FilenameToken,
    /// Last-resort guess by order of first appearance
    StructuralOrder,
    /// Fixed by a base-color directory rather than classified
    BaseColorDirectory,
}

impl fmt::Display for InkTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InkTier::ShirtAvailability => "shirt-availability",
            InkTier::DesignName => "design-name",
            InkTier::FilenameToken => "filename-token",
            InkTier::StructuralOrder => "structural-order",
            InkTier::BaseColorDirectory => "base-color-directory",
        };
        f.write_str(name)
    }
}

/// Outcome of classifying one design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InkVerdict {
    pub design: String,
    pub ink: Option<Ink>,
    pub tier: Option<InkTier>,
}

impl InkVerdict {
    pub fn undetermined(design: &str) -> Self {
        Self { design: design.to_string(), ink: None, tier: None }
    }

    /// True when the ink came from the order-of-appearance guess.
    pub fn is_guess(&self) -> bool {
        self.tier == Some(InkTier::StructuralOrder)
    }
}
