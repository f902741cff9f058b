//! Text normalization helpers for search and ordering.

use unicode_normalization::UnicodeNormalization;

/// Strip diacritics: NFD-decompose, then drop combining marks.
///
/// "Peña" becomes "Pena"; already-plain text passes through unchanged.
pub fn unaccent(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Collation key for Spanish base-letter ordering (strength 1): accents and
/// case are ignored for comparison purposes.
pub fn collation_key(text: &str) -> String {
    unaccent(text).to_lowercase()
}

// Unicode combining diacritical marks block (U+0300..U+036F), which is where
// NFD places the accents used in Spanish.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unaccent_spanish() {
        assert_eq!(unaccent("Peña"), "Pena");
        assert_eq!(unaccent("Ángela"), "Angela");
        assert_eq!(unaccent("camión"), "camion");
        assert_eq!(unaccent("plain"), "plain");
    }

    #[test]
    fn collation_orders_base_letters() {
        let mut names = vec!["Zoe", "Ángela", "Ana"];
        names.sort_by_key(|n| collation_key(n));
        assert_eq!(names, vec!["Ana", "Ángela", "Zoe"]);
    }

    #[test]
    fn collation_ignores_case() {
        assert_eq!(collation_key("PEÑA"), collation_key("peña"));
    }
}
