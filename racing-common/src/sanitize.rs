//! Filename sanitization

/// Characters rejected by at least one common filesystem
pub const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Make `name` safe to use as a single path component.
///
/// Each reserved character becomes `_` and surrounding whitespace is trimmed.
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|ch| if RESERVED_CHARS.contains(&ch) { '_' } else { ch })
        .collect();
    replaced.trim().to_string()
}

/// Collapse runs of `sep` into one and strip it from both ends.
///
/// `"Flemington__Thoroughbred_AUS_"` becomes `"Flemington_Thoroughbred_AUS"`.
pub fn collapse_separators(s: &str, sep: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_sep = false;
    for ch in s.chars() {
        if ch == sep {
            if !last_sep {
                out.push(ch);
            }
            last_sep = true;
        } else {
            out.push(ch);
            last_sep = false;
        }
    }
    out.trim_matches(sep).to_string()
}
