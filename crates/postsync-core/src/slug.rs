//! Title to slug normalization.

/// Normalize a title into a URL-safe slug.
///
/// Lower-cases the text, collapses every run of characters outside
/// `[a-z0-9]` into a single `-` and trims dashes from both ends.
/// Whitespace-only or punctuation-only input yields an empty string.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalizes_punctuation_and_case() {
        assert_eq!(normalize("Hello, World!"), "hello-world");
        assert_eq!(normalize("My First Post!"), "my-first-post");
        assert_eq!(normalize("Rust 2024: what's new?"), "rust-2024-what-s-new");
    }

    #[test]
    fn blank_input_yields_empty_slug() {
        assert_eq!(normalize("  ---  "), "");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\t\n"), "");
    }

    #[test]
    fn non_ascii_letters_become_separators() {
        assert_eq!(normalize("Café au lait"), "caf-au-lait");
        assert_eq!(normalize("日本語"), "");
    }

    proptest! {
        #[test]
        fn slug_uses_only_safe_characters(text in "\\PC{0,40}") {
            let slug = normalize(&text);
            prop_assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn normalize_is_idempotent(text in "\\PC{0,40}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once.clone());
        }
    }
}
