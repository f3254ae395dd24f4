//! Asset path decomposition
//!
//! Catalog photos live under `.../<design>/<color>/<file>`. The two
//! directories immediately before the file name are the authoritative
//! signal for design and shirt color. The file name itself is kept only so
//! the ink filename-token tier can inspect it later; nothing here classifies
//! by file name.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::color::{fold_token, normalize_color, CanonicalColor};

/// An asset URL split by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePath {
    /// The original, untouched URL
    pub url: String,
    /// Directory two levels above the file (percent-decoded)
    pub design_segment: String,
    /// Directory immediately above the file (percent-decoded)
    pub color_segment: String,
    /// Final path segment (percent-decoded)
    pub file_name: String,
}

impl ImagePath {
    /// Shirt color named by the color directory, if recognized.
    pub fn shirt_color(&self) -> Option<CanonicalColor> {
        normalize_color(&self.color_segment)
    }

    /// File name without its extension.
    pub fn file_stem(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(0) | None => &self.file_name,
            Some(dot) => &self.file_name[..dot],
        }
    }

    /// Folded word tokens of the file stem, in order.
    pub fn file_tokens(&self) -> Vec<String> {
        tokenize(self.file_stem())
    }
}

fn word_splitter() -> &'static Regex {
    static SPLIT: OnceLock<Regex> = OnceLock::new();
    SPLIT.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex is valid"))
}

/// Split free text into folded alphanumeric word tokens.
///
/// ```
/// use inkgrid::path::tokenize;
///
/// assert_eq!(tokenize("Wormhole_Negre-Blanc (2)"), vec!["wormhole", "negre", "blanc", "2"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let folded = fold_token(text);
    word_splitter()
        .split(&folded)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an asset URL into its design and color directories.
///
/// Returns `None` when fewer than two directories precede the file name, or
/// when the path ends in a directory. Query strings, fragments, scheme and
/// host are not part of the path.
///
/// # Examples
///
/// ```
/// use inkgrid::path::parse_image_path;
///
/// let parsed = parse_image_path("https://cdn.example.com/shop/Wormhole/negre/a.png?v=2").unwrap();
/// assert_eq!(parsed.design_segment, "Wormhole");
/// assert_eq!(parsed.color_segment, "negre");
/// assert_eq!(parsed.file_name, "a.png");
///
/// assert!(parse_image_path("negre/a.png").is_none());
/// ```
pub fn parse_image_path(url: &str) -> Option<ImagePath> {
    let path = strip_host(strip_query(url));
    if path.ends_with('/') {
        return None;
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 3 {
        return None;
    }

    let n = segments.len();
    Some(ImagePath {
        url: url.to_string(),
        design_segment: percent_decode(segments[n - 3]),
        color_segment: percent_decode(segments[n - 2]),
        file_name: percent_decode(segments[n - 1]),
    })
}

fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

fn strip_host(url: &str) -> &str {
    match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "",
            }
        }
        None => url,
    }
}

/// Decode `%XX` escapes; malformed escapes are kept literally.
fn percent_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
