//! Line-oriented helpers used to stitch rendered siblings together.
//!
//! They only ever touch the first or the last line of a multi-line string,
//! so the inner lines of an already rendered element are never disturbed.

/// Does the text start with a whitespace character?
///
/// The empty string does not.
pub fn starts_with_whitespace(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_whitespace)
}

/// Does the text end with a whitespace character?
///
/// The empty string does not.
pub fn ends_with_whitespace(text: &str) -> bool {
    text.chars().next_back().is_some_and(char::is_whitespace)
}

/// Strip the leading whitespace of the first line only.
pub fn lstrip_first_line(text: &str) -> String {
    match text.split_once('\n') {
        Some((first, rest)) => format!("{}\n{}", first.trim_start(), rest),
        None => text.trim_start().to_string(),
    }
}

/// Strip the trailing whitespace of the last line only.
pub fn rstrip_last_line(text: &str) -> String {
    match text.rsplit_once('\n') {
        Some((rest, last)) => format!("{}\n{}", rest, last.trim_end()),
        None => text.trim_end().to_string(),
    }
}
