use uuid::Uuid;

/// Lowercase ASCII slug: alphanumerics kept, every other run collapses to one '-'
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Share slug for a form title, e.g. "Contact us" -> "contact-us-3f9a1c"
pub fn generate_slug(title: &str) -> String {
    let base = slugify(title);
    let suffix = Uuid::new_v4().simple().to_string();
    let base = if base.is_empty() { "form".to_string() } else { base };
    format!("{}-{}", base, &suffix[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Hello,  World!! "), "hello-world");
        assert_eq!(slugify("Épreuve 2024"), "preuve-2024");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn generated_slugs_are_url_safe_and_distinct() {
        let a = generate_slug("Customer Survey");
        let b = generate_slug("Customer Survey");
        assert!(a.starts_with("customer-survey-"));
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(generate_slug("!!!").starts_with("form-"));
    }
}
