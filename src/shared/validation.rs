use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for administrative geography codes (country, state, district)
    /// Must start with a letter or digit, then letters, digits, hyphens or underscores
    /// - Valid: "IN", "WB", "IN-WB", "KOL_N", "19"
    /// - Invalid: "", "-WB", "W B", "WB!"
    pub static ref GEO_CODE_REGEX: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap();
}

/// Escape `%`, `_` and `\` so user text is matched literally inside a `LIKE` pattern
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
