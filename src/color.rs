//! Canonical shirt colors and loose color-token normalization
//!
//! Every color string the engine sees (variant colors, directory names,
//! filename fragments, user clicks) goes through [`normalize_color`], which
//! either maps it onto the closed [`CanonicalColor`] set or returns `None`.
//! Unrecognized tokens are never guessed; callers decide the fallback.
//!
//! Also hosts hex code parsing for the swatch/display-hex machinery.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Whether a shirt color counts as a light or a dark garment.
///
/// Light ink needs a dark shirt to be visible, dark ink needs a light shirt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShirtTone {
    Light,
    Dark,
}

/// The closed set of shirt colors used throughout the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalColor {
    White,
    #[serde(rename = "Heather-Grey")]
    HeatherGrey,
    Black,
    Red,
    #[serde(rename = "Military-Green")]
    MilitaryGreen,
    #[serde(rename = "Forest-Green")]
    ForestGreen,
    #[serde(rename = "Royal-Blue")]
    RoyalBlue,
    #[serde(rename = "Navy-Blue")]
    NavyBlue,
}

impl CanonicalColor {
    /// All canonical colors in canonical (catalog) order.
    pub const ALL: [CanonicalColor; 8] = [
        CanonicalColor::White,
        CanonicalColor::HeatherGrey,
        CanonicalColor::Black,
        CanonicalColor::Red,
        CanonicalColor::MilitaryGreen,
        CanonicalColor::ForestGreen,
        CanonicalColor::RoyalBlue,
        CanonicalColor::NavyBlue,
    ];

    /// Human-facing name, e.g. `Royal-Blue`.
    pub fn display_name(self) -> &'static str {
        match self {
            CanonicalColor::White => "White",
            CanonicalColor::HeatherGrey => "Heather-Grey",
            CanonicalColor::Black => "Black",
            CanonicalColor::Red => "Red",
            CanonicalColor::MilitaryGreen => "Military-Green",
            CanonicalColor::ForestGreen => "Forest-Green",
            CanonicalColor::RoyalBlue => "Royal-Blue",
            CanonicalColor::NavyBlue => "Navy-Blue",
        }
    }

    /// Lowercase identifier used in slot keys and placeholder file names.
    pub fn slug(self) -> &'static str {
        match self {
            CanonicalColor::White => "white",
            CanonicalColor::HeatherGrey => "heather-grey",
            CanonicalColor::Black => "black",
            CanonicalColor::Red => "red",
            CanonicalColor::MilitaryGreen => "military-green",
            CanonicalColor::ForestGreen => "forest-green",
            CanonicalColor::RoyalBlue => "royal-blue",
            CanonicalColor::NavyBlue => "navy-blue",
        }
    }

    pub fn shirt_tone(self) -> ShirtTone {
        match self {
            CanonicalColor::White | CanonicalColor::HeatherGrey => ShirtTone::Light,
            _ => ShirtTone::Dark,
        }
    }

    /// Known-correct display hex for this color.
    pub fn known_hex(self) -> &'static str {
        match self {
            CanonicalColor::White => "#FFFFFF",
            CanonicalColor::HeatherGrey => "#B7B8BA",
            CanonicalColor::Black => "#111111",
            CanonicalColor::Red => "#C8102E",
            CanonicalColor::MilitaryGreen => "#4B5320",
            CanonicalColor::ForestGreen => "#1F4D2B",
            CanonicalColor::RoyalBlue => "#2851A3",
            CanonicalColor::NavyBlue => "#1F2A44",
        }
    }

    /// The two shirt base colors that dedicated base-color directories are named after.
    pub fn is_base(self) -> bool {
        matches!(self, CanonicalColor::White | CanonicalColor::Black)
    }
}

impl fmt::Display for CanonicalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Synonym table, keyed by folded form (see [`fold_token`]).
///
/// Covers English, Catalan, Spanish and a few French/Italian/German spellings
/// seen in catalog data. Multi-word entries are matched whole.
const SYNONYMS: &[(&str, CanonicalColor)] = &[
    ("white", CanonicalColor::White),
    ("blanc", CanonicalColor::White),
    ("blanca", CanonicalColor::White),
    ("blanco", CanonicalColor::White),
    ("bianco", CanonicalColor::White),
    ("weiss", CanonicalColor::White),
    ("heather grey", CanonicalColor::HeatherGrey),
    ("heather gray", CanonicalColor::HeatherGrey),
    ("heather", CanonicalColor::HeatherGrey),
    ("grey", CanonicalColor::HeatherGrey),
    ("gray", CanonicalColor::HeatherGrey),
    ("gris", CanonicalColor::HeatherGrey),
    ("gris jaspeat", CanonicalColor::HeatherGrey),
    ("gris jaspeado", CanonicalColor::HeatherGrey),
    ("black", CanonicalColor::Black),
    ("negre", CanonicalColor::Black),
    ("negra", CanonicalColor::Black),
    ("negro", CanonicalColor::Black),
    ("noir", CanonicalColor::Black),
    ("nero", CanonicalColor::Black),
    ("schwarz", CanonicalColor::Black),
    ("red", CanonicalColor::Red),
    ("vermell", CanonicalColor::Red),
    ("vermella", CanonicalColor::Red),
    ("rojo", CanonicalColor::Red),
    ("roja", CanonicalColor::Red),
    ("rouge", CanonicalColor::Red),
    ("rosso", CanonicalColor::Red),
    ("military green", CanonicalColor::MilitaryGreen),
    ("military", CanonicalColor::MilitaryGreen),
    ("army green", CanonicalColor::MilitaryGreen),
    ("militar", CanonicalColor::MilitaryGreen),
    ("verd militar", CanonicalColor::MilitaryGreen),
    ("verde militar", CanonicalColor::MilitaryGreen),
    ("vert militaire", CanonicalColor::MilitaryGreen),
    ("forest green", CanonicalColor::ForestGreen),
    ("forest", CanonicalColor::ForestGreen),
    ("verd bosc", CanonicalColor::ForestGreen),
    ("verde bosque", CanonicalColor::ForestGreen),
    ("bosc", CanonicalColor::ForestGreen),
    ("bosque", CanonicalColor::ForestGreen),
    ("royal blue", CanonicalColor::RoyalBlue),
    ("royal", CanonicalColor::RoyalBlue),
    ("blau royal", CanonicalColor::RoyalBlue),
    ("azul royal", CanonicalColor::RoyalBlue),
    ("blau rei", CanonicalColor::RoyalBlue),
    ("azul rey", CanonicalColor::RoyalBlue),
    ("bleu roi", CanonicalColor::RoyalBlue),
    ("navy blue", CanonicalColor::NavyBlue),
    ("navy", CanonicalColor::NavyBlue),
    ("blau mari", CanonicalColor::NavyBlue),
    ("blau marino", CanonicalColor::NavyBlue),
    ("azul marino", CanonicalColor::NavyBlue),
    ("marino", CanonicalColor::NavyBlue),
    ("bleu marine", CanonicalColor::NavyBlue),
];

/// Iterate over every recognized synonym and the color it maps to.
pub fn synonyms() -> impl Iterator<Item = (&'static str, CanonicalColor)> {
    SYNONYMS.iter().copied()
}

/// Fold a raw token for matching.
///
/// Lowercases, strips diacritics, turns `_`, `-`, `%20` and whitespace runs
/// into single spaces, and trims.
///
/// # Examples
///
/// ```
/// use inkgrid::color::fold_token;
///
/// assert_eq!(fold_token("Verd_Militar"), "verd militar");
/// assert_eq!(fold_token("Blau%20Marí"), "blau mari");
/// assert_eq!(fold_token("  NEGRE  "), "negre");
/// ```
pub fn fold_token(token: &str) -> String {
    let replaced = token.replace("%20", " ");
    let mut out = String::with_capacity(replaced.len());
    let mut pending_space = false;

    for c in replaced.chars().flat_map(char::to_lowercase) {
        if c == '_' || c == '-' || c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        // Catalan "l·l"
        if c == '·' {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        match fold_diacritic(c) {
            Some(folded) => out.push_str(folded),
            None => out.push(c),
        }
    }

    out
}

fn fold_diacritic(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' => "a",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

/// Look up an already-folded token in the synonym table.
pub fn lookup_folded(folded: &str) -> Option<CanonicalColor> {
    SYNONYMS.iter().find(|(name, _)| *name == folded).map(|(_, color)| *color)
}

/// Normalize a loose color token to a canonical color.
///
/// Pure and total: any input returns either a canonical color or `None`.
///
/// # Examples
///
/// ```
/// use inkgrid::color::{normalize_color, CanonicalColor};
///
/// assert_eq!(normalize_color("Negre"), Some(CanonicalColor::Black));
/// assert_eq!(normalize_color("royal_blue"), Some(CanonicalColor::RoyalBlue));
/// assert_eq!(normalize_color("Verd-Militar"), Some(CanonicalColor::MilitaryGreen));
/// assert_eq!(normalize_color("turquoise"), None);
/// ```
pub fn normalize_color(token: &str) -> Option<CanonicalColor> {
    let folded = fold_token(token);
    if folded.is_empty() {
        return None;
    }
    lookup_folded(&folded)
}

/// Error type for hex code parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum HexError {
    /// Input string was empty
    #[error("empty hex string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("hex code must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3 or 6 hex chars after #)
    #[error("invalid hex length {0}, expected 3 or 6")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// Parse a `#RGB` or `#RRGGBB` hex code into an opaque RGBA color.
///
/// # Examples
///
/// ```
/// use inkgrid::color::parse_hex;
///
/// assert_eq!(parse_hex("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_hex("#1f2a44").unwrap(), image::Rgba([31, 42, 68, 255]));
/// ```
pub fn parse_hex(s: &str) -> Result<Rgba<u8>, HexError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(HexError::Empty);
    }
    let hex = s.strip_prefix('#').ok_or(HexError::MissingHash)?;

    let digits = hex.chars().map(hex_digit).collect::<Result<Vec<u8>, HexError>>()?;

    match digits.as_slice() {
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r1, r2, g1, g2, b1, b2] => Ok(Rgba([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255])),
        _ => Err(HexError::InvalidLength(digits.len())),
    }
}

fn hex_digit(c: char) -> Result<u8, HexError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        _ => Err(HexError::InvalidHex(c)),
    }
}

/// Format an RGBA color as uppercase `#RRGGBB`, dropping alpha.
pub fn format_hex(color: Rgba<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

/// Whether a color is pure white.
pub fn is_white(color: Rgba<u8>) -> bool {
    color[0] == 255 && color[1] == 255 && color[2] == 255
}
