//! Swatch command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::color::normalize_color;
use crate::placeholder::{render_swatch, PlaceholderResolver};
use crate::suggest::{format_suggestion, suggest_colors};

use super::{config_or_exit, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the swatch command
pub fn run_swatch(token: &str, output: &Path, size: u32, config_path: Option<&Path>) -> ExitCode {
    let Some(color) = normalize_color(token) else {
        eprintln!("Error: unrecognized color '{}'", token);
        if let Some(hint) = format_suggestion(&suggest_colors(token)) {
            eprintln!("{}", hint);
        }
        return ExitCode::from(EXIT_INVALID_ARGS);
    };
    let config = match config_or_exit(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let placeholder = PlaceholderResolver::from_config(&config).resolve(color);
    let image = render_swatch(&placeholder, size);
    if let Err(e) = image.save(output) {
        eprintln!("Error: Failed to write {}: {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("{} ({}) -> {}", color, placeholder.src(), output.display());
    ExitCode::from(EXIT_SUCCESS)
}
