//! Resolve and classify command implementations

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use crate::color::normalize_color;
use crate::diagnostics::{CollectingDiagnostics, Diagnostic, LogDiagnostics};
use crate::gallery::Gallery;
use crate::models::{load_product, InkVerdict, Product, SlotKey, ThumbnailRow};
use crate::selection::{ColorChange, SizeChange};
use crate::suggest::{format_suggestion, suggest_colors};

use super::{config_or_exit, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

fn product_or_exit(path: &Path) -> Result<Product, ExitCode> {
    load_product(path).map_err(|e| {
        eprintln!("Error: {}: {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn print_row(row: &ThumbnailRow) {
    println!("{} ink:", row.ink);
    for slot in &row.slots {
        let src = slot.src().unwrap_or("-");
        let marker = if slot.has_photo() { "photo" } else { "placeholder" };
        println!("  {:<15} {:<8} {:<12} {}", slot.color().display_name(), slot.display_hex, marker, src);
    }
}

/// Execute the resolve command
pub fn run_resolve(
    path: &Path,
    size: Option<&str>,
    color: Option<&str>,
    slot: Option<&str>,
    config_path: Option<&Path>,
    json: bool,
) -> ExitCode {
    let config = match config_or_exit(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let product = match product_or_exit(path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let mut gallery = Gallery::with_config(product, config, Arc::new(LogDiagnostics));

    if let Some(size) = size {
        match gallery.on_size_select(size) {
            SizeChange::Exact => {}
            SizeChange::ColorAtOtherSizes(sizes) => {
                eprintln!("Note: selected color is sold in {}", sizes.join(", "));
            }
            SizeChange::ColorPinned(c) => eprintln!("Note: {} has no variants; showing a stand-in", c),
        }
    }

    if let Some(token) = color {
        let Some(canonical) = normalize_color(token) else {
            eprintln!("Error: unrecognized color '{}'", token);
            if let Some(hint) = format_suggestion(&suggest_colors(token)) {
                eprintln!("{}", hint);
            }
            return ExitCode::from(EXIT_INVALID_ARGS);
        };
        report_color_change(gallery.select_color(canonical));
    }

    if let Some(key) = slot {
        let Some(key) = SlotKey::parse(key) else {
            eprintln!("Error: invalid slot '{}', expected <light|dark>/<color>", key);
            return ExitCode::from(EXIT_INVALID_ARGS);
        };
        match gallery.on_slot_select(key) {
            Some(change) => report_color_change(change),
            None => {
                eprintln!("Error: slot '{}' is not part of the configured rows", key);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    }

    if json {
        return print_json(&gallery.snapshot());
    }

    let snapshot = gallery.snapshot();
    println!("Product: {} ({})", gallery.product().name, snapshot.product_id);
    println!("Sizes: {}", snapshot.available_sizes.join(", "));
    match snapshot.thumbnail_rows {
        Some(rows) => rows.iter().for_each(print_row),
        None => println!("No color semantics; flat gallery"),
    }
    println!("Images:");
    for (i, url) in snapshot.images.iter().enumerate() {
        println!("  {:>2}. {}", i, url);
    }
    let selection = snapshot.selection;
    println!(
        "Selection: size={} color={}",
        selection.size.as_deref().unwrap_or("-"),
        selection.color.map(|c| c.display_name()).unwrap_or("-")
    );
    println!("Main image: {} ({:?})", snapshot.main_image.image.src(), snapshot.main_image.rule);

    ExitCode::from(EXIT_SUCCESS)
}

fn report_color_change(change: ColorChange) {
    match change {
        ColorChange::Exact => {}
        ColorChange::AdoptedSize { to, .. } => eprintln!("Note: switched to size {}", to),
        ColorChange::Pinned => eprintln!("Note: color has no variants; showing a stand-in"),
    }
}

#[derive(Serialize)]
struct Classification<'a> {
    product_id: &'a str,
    verdicts: &'a [InkVerdict],
    diagnostics: Vec<Diagnostic>,
}

/// Execute the classify command
pub fn run_classify(path: &Path, config_path: Option<&Path>, json: bool) -> ExitCode {
    let config = match config_or_exit(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let product = match product_or_exit(path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let diagnostics = Arc::new(CollectingDiagnostics::new());
    let gallery = Gallery::with_config(product, config, diagnostics.clone());
    let verdicts = &gallery.grid().verdicts;

    if json {
        return print_json(&Classification {
            product_id: &gallery.product().id,
            verdicts,
            diagnostics: diagnostics.events(),
        });
    }

    if verdicts.is_empty() {
        println!("No designs found");
    }
    for verdict in verdicts {
        let ink = verdict.ink.map(|i| i.as_str()).unwrap_or("undetermined");
        match verdict.tier {
            Some(tier) => println!("{}: {} ink ({})", verdict.design, ink, tier),
            None => println!("{}: {}", verdict.design, ink),
        }
    }
    for warning in diagnostics.warnings() {
        println!("warning: {}", warning);
    }

    ExitCode::from(EXIT_SUCCESS)
}
