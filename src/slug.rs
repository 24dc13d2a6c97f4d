use chrono::Utc;

/// Maximum slug length before the uniqueness disambiguator is considered.
const SLUG_MAX_LEN: usize = 80;

/// generate_slug
///
/// Derives a URL-safe slug from a post title. Slugs are computed once at post
/// creation, become part of the public URL surface, and are never regenerated,
/// so this function must stay deterministic.
///
/// Normalization steps, in order: lowercase; drop every character outside
/// `[a-z0-9\s-]`; collapse whitespace runs to a single hyphen; collapse
/// repeated hyphens; trim leading/trailing hyphens; truncate to 80 characters
/// (re-trimming any hyphen the cut exposes).
///
/// A title with no usable characters (e.g. all punctuation) produces an empty
/// slug; the caller decides what to do with it.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::new();
    // Starts true so a leading separator is never emitted.
    let mut last_was_hyphen = true;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            last_was_hyphen = false;
        } else if c.is_whitespace() || c == '-' {
            // Whitespace runs and hyphen runs both collapse to one '-'.
            if !last_was_hyphen {
                slug.push('-');
                last_was_hyphen = true;
            }
        }
        // Everything else is stripped.
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.len() > SLUG_MAX_LEN {
        slug.truncate(SLUG_MAX_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

/// disambiguate_slug
///
/// Resolves a slug collision by suffixing a millisecond timestamp. Collisions
/// are resolved, never rejected: two posts titled identically must both be
/// creatable. The suffixed slug may exceed the 80-character cap; only the base
/// slug is bounded.
pub fn disambiguate_slug(slug: &str) -> String {
    format!("{}-{}", slug, Utc::now().timestamp_millis())
}
