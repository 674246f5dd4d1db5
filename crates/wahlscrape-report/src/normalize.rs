//! Name normalization and output field cleaning.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compatibility-decompose, then keep only ASCII. Accents and ligatures
/// reduce to their base letters; anything without an ASCII decomposition
/// (`ß`, `ø`) is dropped.
pub fn fold_to_ascii(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(char::is_ascii)
        .collect()
}

fn non_word_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9_]+").expect("valid regex"))
}

fn underscore_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_+").expect("valid regex"))
}

/// Matching key for municipality names and result file names.
///
/// `"Bad Kreuznach"`, `"bad_kreuznach"` and `"Bad-Kreuznach "` all map to
/// `bad_kreuznach`.
pub fn normalize_name(name: &str) -> String {
    let folded = fold_to_ascii(name).to_lowercase();
    let separated = non_word_runs().replace_all(&folded, "_");
    let collapsed = underscore_runs().replace_all(&separated, "_");
    collapsed.trim_matches('_').to_string()
}

/// Invisible formatting characters and line or paragraph separators.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{00ad}'
            | '\u{061c}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{2028}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206f}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
    )
}

/// Single-line, comma-free form of a report field.
pub fn clean_field(s: &str) -> String {
    let visible: String = s
        .chars()
        .map(|c| if c.is_control() || is_invisible(c) { ' ' } else { c })
        .collect();
    visible
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(',', ";")
}
