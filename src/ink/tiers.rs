//! Per-design ink strategies, one function per tier.
//!
//! Each strategy looks at a single design and either decides its ink or
//! returns `None` to let the next tier try. The product-level structural
//! fallback lives in the parent module because it needs every design.

use crate::color::{lookup_folded, CanonicalColor, ShirtTone};
use crate::models::{Ink, InkTier};
use crate::path::tokenize;

use super::evidence::{DesignAsset, DesignEvidence};

/// A single-design classification tier.
pub type InkStrategy = fn(&DesignEvidence) -> Option<Ink>;

/// Per-design tiers in the order they are tried. First decisive tier wins.
pub const DESIGN_TIERS: [(InkTier, InkStrategy); 3] = [
    (InkTier::ShirtAvailability, by_shirt_availability),
    (InkTier::DesignName, by_design_name),
    (InkTier::FilenameToken, by_filename_tokens),
];

/// Only dark shirts → light ink; only light shirts → dark ink.
///
/// A design sold on both (or neither) kinds of shirt is undecided here.
pub fn by_shirt_availability(design: &DesignEvidence) -> Option<Ink> {
    let dark = design.has_tone(ShirtTone::Dark);
    let light = design.has_tone(ShirtTone::Light);
    match (dark, light) {
        (true, false) => Some(Ink::visible_on(ShirtTone::Dark)),
        (false, true) => Some(Ink::visible_on(ShirtTone::Light)),
        _ => None,
    }
}

const LIGHT_INK_WORDS: &[&str] = &["light", "clar", "clara", "claro", "white", "blanc", "blanca", "blanco"];
const DARK_INK_WORDS: &[&str] = &["dark", "fosc", "fosca", "oscuro", "oscura", "black", "negre", "negra", "negro"];

/// A label such as "Wormhole (tinta blanca)" names its own ink.
pub fn by_design_name(design: &DesignEvidence) -> Option<Ink> {
    let words = tokenize(&design.label);
    let light = words.iter().any(|w| LIGHT_INK_WORDS.contains(&w.as_str()));
    let dark = words.iter().any(|w| DARK_INK_WORDS.contains(&w.as_str()));
    match (light, dark) {
        (true, false) => Some(Ink::Light),
        (false, true) => Some(Ink::Dark),
        _ => None,
    }
}

/// Tokens left after removing every mention of the shirt color.
///
/// Two-word color names ("royal blue", "verd militar") are matched before
/// single words.
pub fn strip_shirt_color(tokens: &[String], shirt: CanonicalColor) -> Vec<String> {
    let mut leftover = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if i + 1 < tokens.len() {
            let pair = format!("{} {}", tokens[i], tokens[i + 1]);
            if lookup_folded(&pair) == Some(shirt) {
                i += 2;
                continue;
            }
        }
        if lookup_folded(&tokens[i]) == Some(shirt) {
            i += 1;
            continue;
        }
        leftover.push(tokens[i].clone());
        i += 1;
    }
    leftover
}

/// Ink vote of one asset: a leftover white token means light ink, black
/// means dark ink.
fn asset_vote(asset: &DesignAsset) -> Option<Ink> {
    let shirt = asset.shirt_color?;
    let leftover = strip_shirt_color(&asset.file_tokens, shirt);
    let white = leftover.iter().any(|t| lookup_folded(t) == Some(CanonicalColor::White));
    let black = leftover.iter().any(|t| lookup_folded(t) == Some(CanonicalColor::Black));
    match (white, black) {
        (true, false) => Some(Ink::Light),
        (false, true) => Some(Ink::Dark),
        _ => None,
    }
}

/// Majority of per-asset filename votes; a tie is undecided.
pub fn by_filename_tokens(design: &DesignEvidence) -> Option<Ink> {
    let (light, dark) = design.assets.iter().filter_map(asset_vote).fold((0usize, 0usize), |(l, d), ink| {
        match ink {
            Ink::Light => (l + 1, d),
            Ink::Dark => (l, d + 1),
        }
    });
    match light.cmp(&dark) {
        std::cmp::Ordering::Greater => Some(Ink::Light),
        std::cmp::Ordering::Less => Some(Ink::Dark),
        std::cmp::Ordering::Equal => None,
    }
}
