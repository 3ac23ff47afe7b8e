//! URL slug generation.

use crate::{Result, ToolkitError};

/// Convert arbitrary text into a lowercase, hyphen-separated slug.
///
/// Every run of characters outside `[a-z0-9]` (after ASCII lowercasing)
/// becomes a single hyphen, and hyphens at either end are dropped. Non-ASCII
/// characters are not transliterated; they act as separators like punctuation.
///
/// Returns [`ToolkitError::EmptyInput`] when nothing usable is left.
pub fn slugify(input: &str) -> Result<String> {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        return Err(ToolkitError::EmptyInput);
    }

    Ok(slug)
}
