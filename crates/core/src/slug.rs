//! URL slug generation for categories and challenges.

/// Build a URL-safe slug from a display name: lowercase, alphanumeric runs
/// joined by single hyphens, everything else dropped.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_title() {
        assert_eq!(generate_slug("Web Development"), "web-development");
    }

    #[test]
    fn punctuation_collapses_to_single_hyphen() {
        assert_eq!(generate_slug("AI / ML Challenge!"), "ai-ml-challenge");
    }

    #[test]
    fn leading_and_trailing_noise_trimmed() {
        assert_eq!(generate_slug("  UX Design  "), "ux-design");
    }

    #[test]
    fn numbers_kept() {
        assert_eq!(generate_slug("Hackathon 2025"), "hackathon-2025");
    }
}
