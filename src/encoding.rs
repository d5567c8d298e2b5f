use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use xhtmlchardet::detect;

use crate::error::Error;

// common shorthand labels that WHATWG does not know about
fn normalize_label(label: &str) -> Cow<str> {
    match label.to_ascii_lowercase().as_str() {
        "utf8" | "u8" | "utf" => "utf-8".into(),
        "latin1" | "latin-1" | "l1" => "iso-8859-1".into(),
        "utf16" => "utf-16".into(),
        _ => label.into(),
    }
}

/// Look up an encoding by label.
pub fn for_label(label: &str) -> Result<&'static Encoding, Error> {
    Encoding::for_label(normalize_label(label).as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

/// Sniff the encoding of markup.
///
/// This looks at a byte order mark and at XML or HTML encoding declarations.
/// Without any of these, UTF-8 is assumed.
pub(crate) fn encoding(data: &[u8], hint: Option<String>) -> Option<&'static Encoding> {
    let mut cursor = std::io::Cursor::new(data);
    let charsets = detect(&mut cursor, hint).ok()?;
    // no encoding detected
    let label = if charsets.is_empty() {
        "UTF-8"
    } else {
        &charsets[0]
    };
    Encoding::for_label(label.as_bytes())
}

/// Decode markup bytes into text.
///
/// With a label the bytes are decoded with that encoding; without one the
/// encoding is sniffed. A byte order mark always wins and is stripped.
pub fn decode(data: &[u8], label: Option<&str>) -> Result<String, Error> {
    let encoding = match label {
        Some(label) => for_label(label)?,
        None => encoding(data, None).unwrap_or(UTF_8),
    };
    let (text, actual, malformed) = encoding.decode(data);
    if malformed {
        return Err(Error::Malformed(actual.name()));
    }
    Ok(text.into_owned())
}

/// Encode rendered text back into bytes of the given encoding.
pub fn encode(text: &str, label: &str) -> Result<Vec<u8>, Error> {
    let encoding = for_label(label)?;
    // encoding_rs refuses to produce UTF-16; it falls back to UTF-8, which
    // is what we want to write then anyway
    let (bytes, _, unmappable) = encoding.encode(text);
    if unmappable {
        return Err(Error::Malformed(encoding.name()));
    }
    Ok(bytes.into_owned())
}
