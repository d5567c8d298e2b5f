use std::borrow::Cow;

/// Is there a complete character or entity reference at `index`?
///
/// Recognizes `&name;`, `&#123;` and `&#x1F;`.
pub fn is_reference_at(text: &str, index: usize) -> bool {
    let bytes = text.as_bytes();
    if bytes.get(index) != Some(&b'&') {
        return false;
    }
    match &bytes[index + 1..] {
        [b'#', b'x' | b'X', body @ ..] => is_terminated(body, u8::is_ascii_hexdigit),
        [b'#', body @ ..] => is_terminated(body, u8::is_ascii_digit),
        body @ [first, ..] if first.is_ascii_alphabetic() => {
            is_terminated(body, u8::is_ascii_alphanumeric)
        }
        _ => false,
    }
}

// a non-empty run of valid bytes closed by `;`
fn is_terminated(body: &[u8], valid: fn(&u8) -> bool) -> bool {
    let length = body.iter().take_while(|b| valid(b)).count();
    length > 0 && body.get(length) == Some(&b';')
}

fn escape(content: Cow<str>, quote: bool) -> Cow<str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>') || (quote && c == '"');
    if !content.contains(needs_escape) {
        return content;
    }
    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if quote => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result.into()
}

/// Escape text content.
pub fn escape_text(content: Cow<str>) -> Cow<str> {
    escape(content, false)
}

/// Escape an attribute value to go between double quotes.
pub fn escape_attribute(content: Cow<str>) -> Cow<str> {
    escape(content, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        let text = "A & B < C > D";
        assert_eq!(escape_text(text.into()), "A &amp; B &lt; C &gt; D");
    }

    #[test]
    fn test_escape_text_leaves_quotes() {
        assert_eq!(escape_text(r#"say "hi""#.into()), r#"say "hi""#);
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(
            escape_attribute(r#"python: a > 'b' and "c""#.into()),
            "python: a &gt; 'b' and &quot;c&quot;"
        );
    }

    #[test]
    fn test_escape_no_entities() {
        let text = "hello";
        let result = escape_attribute(text.into());
        // this is the same slice
        assert!(std::ptr::eq(text, result.as_ref()));
    }

    #[test]
    fn test_is_reference_at() {
        assert!(is_reference_at("&amp;", 0));
        assert!(is_reference_at("a &nbsp; b", 2));
        assert!(is_reference_at("&#160;", 0));
        assert!(is_reference_at("&#xA0;", 0));
        assert!(!is_reference_at("& b", 0));
        assert!(!is_reference_at("&amp", 0));
        assert!(!is_reference_at("&#;", 0));
        assert!(!is_reference_at("&#x;", 0));
        assert!(!is_reference_at("a=1&b=2", 3));
        assert!(!is_reference_at("&", 0));
        assert!(!is_reference_at("amp;", 0));
    }
}
