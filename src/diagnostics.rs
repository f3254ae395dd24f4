//! Injectable diagnostics for resolution decisions
//!
//! The engine never fails on bad catalog data; it absorbs problems into
//! placeholders and defaults. Those decisions are still worth seeing, so
//! every absorbed problem is reported as a [`Diagnostic`] to whatever
//! [`Diagnostics`] observer the caller injected.

use serde::Serialize;
use std::fmt;
use std::sync::Mutex;

use crate::color::CanonicalColor;
use crate::models::Ink;

/// One absorbed data problem or notable guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum Diagnostic {
    /// A color token that matched no canonical color
    UnrecognizedColor { token: String, context: String },
    /// An asset URL without design/color directories
    UnparseablePath { url: String },
    /// No tier could classify a design's ink
    InkUndetermined { design: String, fallback_row: Ink },
    /// A design's ink was assigned by order of appearance
    InkGuessedByOrder { design: String, ink: Ink },
    /// A variant-reported hex was ignored in favor of the known table
    HexDiscarded { color: CanonicalColor, reported: String },
    /// Assets are grouped by base-color directories instead of design folders
    BaseColorLayout { groups: Vec<String> },
}

impl Diagnostic {
    /// Guesses and data defects; everything else is informational.
    pub fn is_warning(&self) -> bool {
        !matches!(self, Diagnostic::BaseColorLayout { .. } | Diagnostic::UnparseablePath { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnrecognizedColor { token, context } => {
                write!(f, "unrecognized color '{}' in {}", token, context)
            }
            Diagnostic::UnparseablePath { url } => {
                write!(f, "asset '{}' has no design/color directories", url)
            }
            Diagnostic::InkUndetermined { design, fallback_row } => {
                write!(f, "ink of design '{}' undetermined, using {} row", design, fallback_row)
            }
            Diagnostic::InkGuessedByOrder { design, ink } => {
                write!(f, "ink of design '{}' guessed as {} by order of appearance", design, ink)
            }
            Diagnostic::HexDiscarded { color, reported } => {
                write!(f, "discarded reported hex '{}' for {}", reported, color)
            }
            Diagnostic::BaseColorLayout { groups } => {
                write!(f, "base-color directory layout ({})", groups.join(", "))
            }
        }
    }
}

/// Observer for diagnostics.
pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, diagnostic: &Diagnostic) {
        if diagnostic.is_warning() {
            log::warn!("{}", diagnostic);
        } else {
            log::debug!("{}", diagnostic);
        }
    }
}

/// Records diagnostics in memory.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.events().into_iter().filter(Diagnostic::is_warning).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn report(&self, diagnostic: &Diagnostic) {
        if let Ok(mut events) = self.events.lock() {
            events.push(diagnostic.clone());
        }
    }
}
