//! Normalization of raw client column labels.

use deunicode::deunicode_char;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalize a raw column label into snake_case.
///
/// Lowercases, strips accents to their base letter, transliterates letters
/// without a decomposition (`ß` → `ss`, `ø` → `o`, `ł` → `l`), turns every
/// run of whitespace/punctuation/symbols into a single underscore and trims
/// underscores at both ends. Never produces the `__` role separator.
///
/// The function is total but not injective: `"Sales "` and `"sales"` both
/// become `"sales"`. Callers that rename with the result must detect that.
///
/// # Examples
///
/// ```
/// use mmm_map::normalize_column_name;
///
/// assert_eq!(normalize_column_name("  TV Spend (€) "), "tv_spend");
/// assert_eq!(normalize_column_name("Dépenses-Radio"), "depenses_radio");
/// assert_eq!(normalize_column_name("media__tv"), "media_tv");
/// assert_eq!(normalize_column_name("Straße"), "strasse");
/// ```
pub fn normalize_column_name(raw: &str) -> String {
    let mut folded = String::with_capacity(raw.len());
    for ch in raw.nfkd().filter(|ch| !is_combining_mark(*ch)) {
        match deunicode_char(ch) {
            Some(ascii) if !ch.is_ascii() && ch.is_alphabetic() => folded.push_str(ascii),
            _ => folded.push(ch),
        }
    }

    let mut out = String::with_capacity(folded.len());
    let mut last_was_underscore = true; // Treat start as underscore to skip leading
    for ch in folded.chars() {
        for lower in ch.to_lowercase() {
            if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
                out.push(lower);
                last_was_underscore = false;
            } else if !last_was_underscore {
                out.push('_');
                last_was_underscore = true;
            }
        }
    }

    if out.ends_with('_') {
        out.pop();
    }
    out
}
