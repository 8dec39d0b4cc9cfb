//! Static registry of the 24 official EU languages.
//!
//! Maps human-readable names to the two-letter codes used both in
//! EUR-Lex document URLs (upper-cased there) and as storage directory
//! names. The set is closed and fixed at compile time.

/// `(name, code)` pairs for every official EU language.
pub const LANGUAGES: [(&str, &str); 24] = [
    ("Bulgarian", "bg"),
    ("Croatian", "hr"),
    ("Czech", "cs"),
    ("Danish", "da"),
    ("Dutch", "nl"),
    ("English", "en"),
    ("Estonian", "et"),
    ("Finnish", "fi"),
    ("French", "fr"),
    ("German", "de"),
    ("Greek", "el"),
    ("Hungarian", "hu"),
    ("Irish", "ga"),
    ("Italian", "it"),
    ("Latvian", "lv"),
    ("Lithuanian", "lt"),
    ("Maltese", "mt"),
    ("Polish", "pl"),
    ("Portuguese", "pt"),
    ("Romanian", "ro"),
    ("Slovak", "sk"),
    ("Slovenian", "sl"),
    ("Spanish", "es"),
    ("Swedish", "sv"),
];

/// All two-letter codes, in registry order.
pub fn all_codes() -> Vec<&'static str> {
    LANGUAGES.iter().map(|(_, code)| *code).collect()
}

/// Look up a language code by its English name (case-insensitive).
pub fn code_for(name: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
}

/// Whether `code` (any case) is a registered two-letter language code.
pub fn is_valid_code(code: &str) -> bool {
    LANGUAGES
        .iter()
        .any(|(_, c)| c.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_24_unique_codes() {
        let mut codes = all_codes();
        assert_eq!(codes.len(), 24);
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 24);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(code_for("English"), Some("en"));
        assert_eq!(code_for("german"), Some("de"));
        assert_eq!(code_for("Klingon"), None);
    }

    #[test]
    fn code_validation_ignores_case() {
        assert!(is_valid_code("en"));
        assert!(is_valid_code("EN"));
        assert!(!is_valid_code("xx"));
    }
}
