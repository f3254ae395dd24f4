//! "Did you mean" hints for unrecognized color tokens

use crate::color::{fold_token, synonyms, CanonicalColor};

/// Edit distance beyond which a synonym is not worth suggesting
pub const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Levenshtein distance over chars (insert, delete, substitute).
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(substitution);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Canonical colors whose synonyms are close to `token`, closest first.
///
/// Each color appears once, scored by its nearest synonym. At most three
/// colors are returned; ties keep canonical order.
///
/// ```
/// use inkgrid::color::CanonicalColor;
/// use inkgrid::suggest::suggest_colors;
///
/// assert_eq!(suggest_colors("vermel")[0], CanonicalColor::Red);
/// assert!(suggest_colors("xylophone").is_empty());
/// ```
pub fn suggest_colors(token: &str) -> Vec<CanonicalColor> {
    let folded = fold_token(token);
    if folded.is_empty() {
        return Vec::new();
    }

    let mut best: Vec<(CanonicalColor, usize)> = Vec::new();
    for (name, color) in synonyms() {
        let distance = levenshtein_distance(&folded, name);
        if distance > MAX_SUGGESTION_DISTANCE || distance >= name.chars().count() {
            continue;
        }
        match best.iter_mut().find(|(c, _)| *c == color) {
            Some(entry) => entry.1 = entry.1.min(distance),
            None => best.push((color, distance)),
        }
    }

    best.sort_by_key(|(color, distance)| (*distance, *color));
    best.into_iter().take(3).map(|(color, _)| color).collect()
}

/// Format suggestions as a "did you mean" sentence, `None` when empty.
pub fn format_suggestion(colors: &[CanonicalColor]) -> Option<String> {
    let quoted: Vec<String> = colors.iter().map(|c| format!("'{}'", c)).collect();
    match quoted.as_slice() {
        [] => None,
        [one] => Some(format!("Did you mean {}?", one)),
        [init @ .., last] => Some(format!("Did you mean {} or {}?", init.join(", "), last)),
    }
}
