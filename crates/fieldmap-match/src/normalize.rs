//! Canonicalization of field names and labels for comparison.

/// Abbreviations expanded during normalization. Expansions are themselves
/// fixed points of `normalize`, which keeps the function idempotent.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("addr", "address"),
    ("desc", "description"),
    ("dt", "date"),
    ("id", "identifier"),
    ("ident", "identifier"),
    ("lat", "latitude"),
    ("lng", "longitude"),
    ("lon", "longitude"),
    ("no", "number"),
    ("num", "number"),
    ("qty", "quantity"),
    ("tech", "technician"),
];

/// Canonicalize a field name or label for comparison.
///
/// Lower-cases, trims, folds separator runs (`_`, `-`, `.`, `/`, `\` and
/// whitespace) into single spaces, strips remaining punctuation, and expands
/// a fixed set of common abbreviations. Every string has a canonical form;
/// the empty string normalizes to itself.
pub fn normalize(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if matches!(ch, '_' | '-' | '.' | '/' | '\\') || ch.is_whitespace() {
            cleaned.push(' ');
        } else {
            // Remaining punctuation (and any mark a lowercase expansion
            // introduces) is dropped entirely.
            for lower in ch.to_lowercase() {
                if lower.is_alphanumeric() {
                    cleaned.push(lower);
                }
            }
        }
    }
    cleaned
        .split_whitespace()
        .map(expand_abbreviation)
        .collect::<Vec<_>>()
        .join(" ")
}

fn expand_abbreviation(token: &str) -> &str {
    match ABBREVIATIONS.binary_search_by_key(&token, |&(short, _)| short) {
        Ok(index) => ABBREVIATIONS[index].1,
        Err(_) => token,
    }
}
