//! CLI integration tests for the `inkgrid` binary.
//!
//! Runs every subcommand against the product fixtures in tests/fixtures and
//! checks text output, JSON output and exit codes.

use std::path::PathBuf;
use std::process::Command;

const CONFIG: &str = "tests/fixtures/gallery.toml";

/// Run inkgrid with the given arguments and return (stdout, stderr, exit code).
fn run(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_inkgrid"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute inkgrid");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

// ============================================================================
// normalize
// ============================================================================

#[test]
fn test_normalize_known_tokens() {
    let (stdout, _, code) = run(&["normalize", "Blau_Marí", "negre", "Verd-Militar"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Blau_Marí -> Navy-Blue"));
    assert!(stdout.contains("negre -> Black"));
    assert!(stdout.contains("Verd-Militar -> Military-Green"));
}

#[test]
fn test_normalize_unknown_token_suggests() {
    let (stdout, _, code) = run(&["normalize", "vermel"]);
    assert_eq!(code, 1);
    assert!(stdout.contains("unrecognized"));
    assert!(stdout.contains("Did you mean 'Red'"));
}

#[test]
fn test_normalize_json() {
    let (stdout, _, _) = run(&["normalize", "blanc", "turquoise", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json[0]["color"], "White");
    assert!(json[1]["color"].is_null());
}

// ============================================================================
// resolve / classify
// ============================================================================

#[test]
fn test_resolve_color_adopts_size() {
    let (stdout, stderr, code) = run(&[
        "resolve",
        "tests/fixtures/wormhole.json",
        "--config",
        CONFIG,
        "--color",
        "vermell",
        "--json",
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["selection"]["size"], "XL");
    assert_eq!(json["selection"]["color"], "Red");
    assert_eq!(
        json["mainImage"]["image"]["url"],
        "https://cdn.example.com/products/Cosmos/Wormhole/vermell/front.png"
    );
    let light = &json["thumbnailRows"][0];
    assert_eq!(light["ink"], "light");
    assert_eq!(light["slots"].as_array().unwrap().len(), 6);
    assert_eq!(light["slots"][5]["display_hex"], "#C8102E");
    assert_eq!(json["availableSizes"], serde_json::json!(["M", "L", "XL"]));
}

#[test]
fn test_resolve_text_output() {
    let (stdout, _, code) = run(&["resolve", "tests/fixtures/wormhole.json", "--config", CONFIG]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Product: Wormhole Tee (wormhole-tee)"));
    assert!(stdout.contains("light ink:"));
    assert!(stdout.contains("dark ink:"));
    assert!(stdout.contains("placeholders/tee-white.png"));
}

#[test]
fn test_resolve_rejects_unknown_color() {
    let (_, stderr, code) =
        run(&["resolve", "tests/fixtures/wormhole.json", "--config", CONFIG, "--color", "blak"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("unrecognized color 'blak'"));
    assert!(stderr.contains("Black"));
}

#[test]
fn test_resolve_missing_file() {
    let (_, stderr, code) = run(&["resolve", "tests/fixtures/nope.json", "--config", CONFIG]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to read product"));
}

#[test]
fn test_classify_reports_guess() {
    let (stdout, _, code) =
        run(&["classify", "tests/fixtures/catalog/cosmos/orbit.json", "--config", CONFIG]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Orbit: light ink (structural-order)"));
    assert!(stdout.contains("Nova: dark ink (structural-order)"));
    assert!(stdout.contains("warning:"));
}

#[test]
fn test_classify_base_color_layout_json() {
    let (stdout, _, code) =
        run(&["classify", "tests/fixtures/catalog/basics.json", "--config", CONFIG, "--json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["verdicts"][0]["tier"], "base-color-directory");
    assert_eq!(json["verdicts"][0]["ink"], "light");
    assert_eq!(json["verdicts"][1]["ink"], "dark");
}

// ============================================================================
// audit
// ============================================================================

#[test]
fn test_audit_strict_fails_on_guesses() {
    let (stdout, _, code) = run(&["audit", "tests/fixtures/catalog", "--config", CONFIG, "--strict"]);
    assert_eq!(code, 1);
    assert!(stdout.contains("guessed ink by order: Orbit"));
    assert!(stdout.contains("2 product(s) audited, 1 flagged"));
}

#[test]
fn test_audit_lenient_succeeds() {
    let (_, _, code) = run(&["audit", "tests/fixtures/catalog", "--config", CONFIG]);
    assert_eq!(code, 0);
}

// ============================================================================
// swatch
// ============================================================================

#[test]
fn test_swatch_writes_png() {
    let dir = tempfile::TempDir::new().unwrap();
    let out: PathBuf = dir.path().join("forest.png");
    let (stdout, _, code) =
        run(&["swatch", "verd bosc", "-o", out.to_str().unwrap(), "--size", "8", "--config", CONFIG]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Forest-Green"));

    let img = image::open(&out).expect("swatch is a readable PNG").to_rgba8();
    assert_eq!(img.dimensions(), (8, 8));
    assert_eq!(img.get_pixel(0, 0).0, [0x1F, 0x4D, 0x2B, 255]);
}
