//! URL slugs for games

use crate::error::DomainError;

/// Check a slug against `^[a-z0-9-]+$`
pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
    let valid = !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidSlug(slug.to_string()))
    }
}

/// Derive a slug from a title.
///
/// Lowercases, turns whitespace runs into a single `-`, drops every other character
/// outside `[a-z0-9-]`, then collapses repeated dashes and trims them from both ends.
/// The result may be empty for titles with no usable characters.
pub fn slugify(title: &str) -> String {
    let mut raw = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            if !in_space {
                raw.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            raw.push(c);
        }
    }

    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(c);
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("the-witcher-3").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("The-Witcher").is_err());
        assert!(validate_slug("witcher_3").is_err());
        assert!(validate_slug("witcher 3").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("The Witcher 3"), "the-witcher-3");
        assert_eq!(slugify("Zelda: Breath of the Wild"), "zelda-breath-of-the-wild");
        assert_eq!(slugify("  Half - Life  2 "), "half-life-2");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_output_validates() {
        for title in ["Stardew Valley", "Baldur's Gate 3", "FIFA   24"] {
            assert!(validate_slug(&slugify(title)).is_ok(), "{title}");
        }
    }
}
