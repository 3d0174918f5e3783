use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating category slugs used in URLs
    /// Must be lowercase alphanumeric with single hyphens
    /// - Valid: "home-decor", "toys", "tabletop-minis"
    /// - Invalid: "-decor", "decor-", "home--decor", "Decor", "home_decor"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("home-decor"));
        assert!(SLUG_REGEX.is_match("toys"));
        assert!(SLUG_REGEX.is_match("tabletop-minis"));
        assert!(SLUG_REGEX.is_match("a"));
        assert!(SLUG_REGEX.is_match("print123"));
        assert!(SLUG_REGEX.is_match("a-b-c"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-decor")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("decor-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("home--decor")); // double hyphen
        assert!(!SLUG_REGEX.is_match("Decor")); // uppercase
        assert!(!SLUG_REGEX.is_match("home_decor")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
        assert!(!SLUG_REGEX.is_match("home decor")); // space
    }
}
