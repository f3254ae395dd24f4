//! Ink classification
//!
//! Decides, per design, whether its print is light or dark ink. Tiers are
//! ordered strategies tried one after another; the first decisive tier wins:
//!
//! 1. shirt availability (dark shirts only → light ink, and vice versa)
//! 2. ink words in the design's own label
//! 3. white/black tokens left in file names after removing the shirt color
//! 4. structural fallback over the whole product (see [`classify_designs`])
//!
//! Designs that stay undetermined are returned with `ink: None`; the grid
//! builder routes them to a single generic row.

mod evidence;
mod tiers;

pub use evidence::{DesignAsset, DesignCatalog, DesignEvidence};
pub use tiers::{
    by_design_name, by_filename_tokens, by_shirt_availability, strip_shirt_color, InkStrategy,
    DESIGN_TIERS,
};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::models::{Ink, InkTier, InkVerdict};

/// Run the per-design tiers in order.
pub fn classify_design(design: &DesignEvidence) -> InkVerdict {
    for (tier, strategy) in DESIGN_TIERS {
        if let Some(ink) = strategy(design) {
            log::debug!("design '{}' classified as {} ink by {}", design.label, ink, tier);
            return InkVerdict { design: design.label.clone(), ink: Some(ink), tier: Some(tier) };
        }
    }
    InkVerdict::undetermined(&design.label)
}

/// Classify every design of a product, in catalog order.
///
/// After the per-design tiers, a structural fallback applies when the
/// product has exactly two designs and they are not both resolved. This is
/// a guess of last resort for a known ambiguity in catalog data, not a
/// principled rule:
///
/// - one resolved: the other gets the complementary ink
/// - neither resolved: first discovered is light ink, second is dark ink
///
/// Each guessed design is reported as [`Diagnostic::InkGuessedByOrder`].
pub fn classify_designs(catalog: &DesignCatalog, diagnostics: &dyn Diagnostics) -> Vec<InkVerdict> {
    let mut verdicts: Vec<InkVerdict> = catalog.designs().iter().map(classify_design).collect();

    if let [first, second] = verdicts.as_mut_slice() {
        let guesses = match (first.ink, second.ink) {
            (Some(_), Some(_)) => None,
            (Some(ink), None) => Some((None, Some(ink.complement()))),
            (None, Some(ink)) => Some((Some(ink.complement()), None)),
            (None, None) => Some((Some(Ink::Light), Some(Ink::Dark))),
        };

        if let Some((first_guess, second_guess)) = guesses {
            for (verdict, guess) in [(first, first_guess), (second, second_guess)] {
                if let Some(ink) = guess {
                    verdict.ink = Some(ink);
                    verdict.tier = Some(InkTier::StructuralOrder);
                    diagnostics.report(&Diagnostic::InkGuessedByOrder {
                        design: verdict.design.clone(),
                        ink,
                    });
                }
            }
        }
    }

    verdicts
}
