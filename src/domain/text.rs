//! Pure text transforms
//!
//! Reproduce these steps exactly to get consistent slugs across scripts.

/// Derives a lowercase, hyphen-joined slug
///
/// The text is transliterated to ASCII, lowercased and stripped of
/// apostrophes. Every run of characters that are neither word characters
/// (`[a-z0-9_]`) nor listed in `allow` becomes a single `-`. Leading and
/// trailing hyphens are dropped.
///
/// ```
/// use scriptkit::domain::slugify;
///
/// assert_eq!(slugify("Héllo World!", ""), "hello-world");
/// assert_eq!(slugify("v1.2 notes", "."), "v1.2-notes");
/// ```
pub fn slugify(text: &str, allow: &str) -> String {
    let ascii = deunicode::deunicode(text).to_lowercase().replace('\'', "");

    let mut slug = String::with_capacity(ascii.len());
    let mut in_gap = false;

    for c in ascii.chars() {
        if is_word_char(c) || allow.contains(c) {
            if in_gap && !slug.is_empty() {
                slug.push('-');
            }
            in_gap = false;
            slug.push(c);
        } else {
            in_gap = true;
        }
    }

    slug
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces curly quotation marks with their straight ASCII equivalents
///
/// For text mangled by a word processor.
pub fn strip_smartquotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201c}' | '\u{201d}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}
