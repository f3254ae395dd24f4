//! Audit command implementation
//!
//! Builds the grid of every product under a directory and reports designs
//! whose ink was only guessed or could not be determined.

use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::GalleryConfig;
use crate::diagnostics::{CollectingDiagnostics, Diagnostic};
use crate::grid::ThumbnailGridBuilder;
use crate::models::{load_product, valid_variants};

use super::{config_or_exit, find_product_files, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Audit result for one product file
#[derive(Debug, Serialize)]
struct AuditEntry {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_id: Option<String>,
    /// Designs placed by order of appearance
    guessed: Vec<String>,
    /// Designs placed in the generic row
    undetermined: Vec<String>,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AuditEntry {
    fn is_clean(&self) -> bool {
        self.guessed.is_empty() && self.undetermined.is_empty() && self.error.is_none()
    }
}

fn audit_file(path: &Path, config: &GalleryConfig) -> AuditEntry {
    let mut entry = AuditEntry {
        path: path.to_path_buf(),
        product_id: None,
        guessed: Vec::new(),
        undetermined: Vec::new(),
        warnings: Vec::new(),
        error: None,
    };

    let product = match load_product(path) {
        Ok(p) => p,
        Err(e) => {
            entry.error = Some(e.to_string());
            return entry;
        }
    };

    let diagnostics = CollectingDiagnostics::new();
    let variants = valid_variants(&product, &diagnostics);
    ThumbnailGridBuilder::new(config, &diagnostics).build(&variants, &product.images);

    for event in diagnostics.warnings() {
        match &event {
            Diagnostic::InkGuessedByOrder { design, .. } => entry.guessed.push(design.clone()),
            Diagnostic::InkUndetermined { design, .. } => entry.undetermined.push(design.clone()),
            _ => entry.warnings.push(event.to_string()),
        }
    }
    entry.product_id = Some(product.id);
    entry
}

/// Execute the audit command
pub fn run_audit(dir: &Path, strict: bool, config_path: Option<&Path>, json: bool) -> ExitCode {
    if !dir.is_dir() {
        eprintln!("Error: '{}' is not a directory", dir.display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    let config = match config_or_exit(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let files = find_product_files(dir);
    log::debug!("auditing {} product file(s) under {}", files.len(), dir.display());

    let entries: Vec<AuditEntry> = files.par_iter().map(|path| audit_file(path, &config)).collect();
    let flagged = entries.iter().filter(|e| !e.is_clean()).count();

    if json {
        match serde_json::to_string_pretty(&entries) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for entry in &entries {
            let name = entry.product_id.as_deref().unwrap_or("?");
            if let Some(error) = &entry.error {
                println!("{}: error: {}", entry.path.display(), error);
                continue;
            }
            if entry.is_clean() && entry.warnings.is_empty() {
                continue;
            }
            println!("{} ({}):", entry.path.display(), name);
            for design in &entry.guessed {
                println!("  guessed ink by order: {}", design);
            }
            for design in &entry.undetermined {
                println!("  undetermined ink: {}", design);
            }
            for warning in &entry.warnings {
                println!("  {}", warning);
            }
        }
        println!("{} product(s) audited, {} flagged", entries.len(), flagged);
    }

    if strict && flagged > 0 {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
