//! Filesystem-safe path component sanitization.

/// Longest component Linux accepts (NAME_MAX).
const NAME_MAX: usize = 255;

fn is_disallowed(c: char) -> bool {
    matches!(
        c,
        '\0' | '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*' | '&'
    ) || c.is_control()
        || c.is_whitespace()
}

/// Sanitizes one path component (a host, a URL path segment, or a title).
///
/// - Replaces NUL, control chars, whitespace and `/ \ < > : " | ? * &` with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Limits length to 255 bytes
///
/// May return an empty string; callers decide the fallback.
pub fn sanitize_component(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if is_disallowed(c) { '_' } else { c };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    truncate_to(trimmed, NAME_MAX).to_string()
}

/// Joins `stem` and `ext` into a file name that still fits NAME_MAX once the
/// `.part` temp suffix is appended. Only the stem is shortened.
pub fn fit_file_name(stem: &str, ext: &str) -> String {
    let ext = ext.trim_start_matches('.');
    let budget = NAME_MAX.saturating_sub(ext.len() + 1 + crate::storage::TEMP_SUFFIX.len());
    let stem = truncate_to(stem, budget).trim_end_matches(|c| c == '.' || c == '_');
    format!("{}.{}", stem, ext)
}

/// Truncates `s` to at most `max` bytes on a char boundary.
pub(super) fn truncate_to(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
