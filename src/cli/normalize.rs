//! Normalize command implementation

use serde::Serialize;
use std::process::ExitCode;

use crate::color::{normalize_color, CanonicalColor};
use crate::suggest::{format_suggestion, suggest_colors};

use super::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Serialize)]
struct NormalizedToken<'a> {
    token: &'a str,
    color: Option<CanonicalColor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<CanonicalColor>,
}

/// Execute the normalize command
pub fn run_normalize(tokens: &[String], json: bool) -> ExitCode {
    let results: Vec<NormalizedToken> = tokens
        .iter()
        .map(|token| {
            let color = normalize_color(token);
            let suggestions = if color.is_none() { suggest_colors(token) } else { Vec::new() };
            NormalizedToken { token, color, suggestions }
        })
        .collect();

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for result in &results {
            match result.color {
                Some(color) => println!("{} -> {}", result.token, color),
                None => match format_suggestion(&result.suggestions) {
                    Some(hint) => println!("{} -> unrecognized. {}", result.token, hint),
                    None => println!("{} -> unrecognized", result.token),
                },
            }
        }
    }

    if results.iter().all(|r| r.color.is_some()) {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}
