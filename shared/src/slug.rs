//! URL and filename safe identifiers.

/// Lowercase `value`, collapse every run of characters outside `[a-z0-9]`
/// into a single `-`, and trim leading and trailing dashes.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("The Mayhem Ball"), "the-mayhem-ball");
        assert_eq!(slugify("  Florence + The Machine!  "), "florence-the-machine");
        assert_eq!(slugify("Madison Square Garden"), "madison-square-garden");
        assert_eq!(slugify("It's Not That Deep"), "it-s-not-that-deep");
        assert_eq!(slugify("Rush: Fifty Something (2026)"), "rush-fifty-something-2026");
    }

    #[test]
    fn test_slugify_non_ascii_and_empty() {
        assert_eq!(slugify("Estadio Azteca — Ciudad de México"), "estadio-azteca-ciudad-de-m-xico");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify(""), "");
    }
}
