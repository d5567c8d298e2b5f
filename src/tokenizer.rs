//! A forgiving markup tokenizer.
//!
//! This never fails: anything it cannot make sense of is passed along as
//! text. Character references are not decoded, so text and attribute values
//! are slices of the input exactly as written.
use genawaiter::rc::gen;
use genawaiter::yield_;
use memchr::{memchr, memmem};

use crate::parse::ParseMode;

const COMMENT_START: &[u8] = b"<!--";
const CDATA_START: &[u8] = b"<![CDATA[";
const DOCTYPE_START: &[u8] = b"<!doctype";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    StartTag {
        name: &'a str,
        attributes: Vec<(&'a str, Option<&'a str>)>,
        self_closing: bool,
    },
    EndTag(&'a str),
    Comment(&'a str),
    Doctype(&'a str),
    ProcessingInstruction(&'a str),
    Cdata(&'a str),
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_name_start(c: u8, mode: ParseMode) -> bool {
    c.is_ascii_alphabetic() || (mode == ParseMode::Xml && matches!(c, b'_' | b':'))
}

fn is_name_end(c: u8) -> bool {
    c.is_ascii_whitespace() || c == b'/' || c == b'>'
}

// does the `<` at `i` open markup, or is it just a stray character?
fn is_markup_start(bytes: &[u8], i: usize, mode: ParseMode) -> bool {
    match bytes.get(i + 1) {
        Some(b'!') | Some(b'?') => true,
        Some(b'/') => bytes.get(i + 2).is_some_and(|c| is_name_start(*c, mode)),
        Some(c) => is_name_start(*c, mode),
        None => false,
    }
}

// find `needle` at or after `from`; returns the absolute index
fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    memmem::find(&bytes[from..], needle).map(|found| from + found)
}

// the end of a doctype, skipping over an internal subset in brackets
fn find_doctype_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in bytes.iter().enumerate().skip(from) {
        match c {
            b'[' => depth += 1,
            b']' => depth = depth.saturating_sub(1),
            b'>' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

// the end of raw text: the start of `</name` followed by whitespace or `>`
fn find_raw_text_end(bytes: &[u8], from: usize, name: &[u8]) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        i += memchr(b'<', &bytes[i..])?;
        if bytes.get(i + 1) == Some(&b'/')
            && starts_with_ignore_ascii_case_at(bytes, i + 2, name)
            && bytes
                .get(i + 2 + name.len())
                .map_or(true, |c| c.is_ascii_whitespace() || *c == b'>')
        {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn skip_whitespace(bytes: &[u8], mut k: usize) -> usize {
    while k < bytes.len() && bytes[k].is_ascii_whitespace() {
        k += 1;
    }
    k
}

struct StartTag<'a> {
    name: &'a str,
    attributes: Vec<(&'a str, Option<&'a str>)>,
    self_closing: bool,
    end: usize,
}

fn scan_start_tag(input: &str, i: usize) -> StartTag<'_> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let name_start = i + 1;
    let mut k = name_start;
    while k < len && !is_name_end(bytes[k]) {
        k += 1;
    }
    let name = &input[name_start..k];
    let mut attributes = Vec::new();
    let mut self_closing = false;

    loop {
        k = skip_whitespace(bytes, k);
        if k >= len {
            break;
        }
        if bytes[k] == b'>' {
            k += 1;
            break;
        }
        if bytes[k] == b'/' {
            if bytes.get(k + 1) == Some(&b'>') {
                self_closing = true;
                k += 2;
                break;
            }
            k += 1;
            continue;
        }
        let attribute_start = k;
        while k < len && !is_name_end(bytes[k]) && bytes[k] != b'=' {
            k += 1;
        }
        if attribute_start == k {
            // a stray `=`
            k += 1;
            continue;
        }
        let attribute_name = &input[attribute_start..k];
        k = skip_whitespace(bytes, k);
        if k >= len || bytes[k] != b'=' {
            attributes.push((attribute_name, None));
            continue;
        }
        k = skip_whitespace(bytes, k + 1);
        if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
            let quote = bytes[k];
            let value_start = k + 1;
            k = memchr(quote, &bytes[value_start..]).map_or(len, |found| value_start + found);
            attributes.push((attribute_name, Some(&input[value_start..k])));
            if k < len {
                k += 1;
            }
        } else {
            let value_start = k;
            while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                if bytes[k] == b'/' && bytes.get(k + 1) == Some(&b'>') {
                    break;
                }
                k += 1;
            }
            attributes.push((attribute_name, Some(&input[value_start..k])));
        }
    }
    StartTag {
        name,
        attributes,
        self_closing,
        end: k,
    }
}

/// Split markup into tokens.
///
/// In [`ParseMode::Html`] the content of `script` and `style` is raw text
/// and a processing instruction ends at the first `>`. In
/// [`ParseMode::Xml`] a processing instruction ends at `?>` and names may
/// start with `_` or `:`.
pub(crate) fn tokenize(input: &str, mode: ParseMode) -> impl Iterator<Item = Token<'_>> + '_ {
    gen!({
        let bytes = input.as_bytes();
        let len = bytes.len();
        let mut i = 0;
        while i < len {
            // text runs up to the next `<` that opens markup
            let text_start = i;
            while i < len {
                match memchr(b'<', &bytes[i..]) {
                    Some(found) => {
                        i += found;
                        if is_markup_start(bytes, i, mode) {
                            break;
                        }
                        i += 1;
                    }
                    None => i = len,
                }
            }
            if i > text_start {
                yield_!(Token::Text(&input[text_start..i]));
            }
            if i >= len {
                break;
            }

            if bytes[i..].starts_with(COMMENT_START) {
                let content_start = i + COMMENT_START.len();
                let end = find(bytes, content_start, b"-->");
                yield_!(Token::Comment(&input[content_start..end.unwrap_or(len)]));
                i = end.map_or(len, |end| end + 3);
                continue;
            }
            if bytes[i..].starts_with(CDATA_START) {
                let content_start = i + CDATA_START.len();
                let end = find(bytes, content_start, b"]]>");
                yield_!(Token::Cdata(&input[content_start..end.unwrap_or(len)]));
                i = end.map_or(len, |end| end + 3);
                continue;
            }
            if starts_with_ignore_ascii_case_at(bytes, i, DOCTYPE_START) {
                let content_start = i + DOCTYPE_START.len();
                let end = find_doctype_end(bytes, content_start);
                yield_!(Token::Doctype(
                    input[content_start..end.unwrap_or(len)].trim()
                ));
                i = end.map_or(len, |end| end + 1);
                continue;
            }
            if bytes[i + 1] == b'!' {
                // bogus comment, like `<!ELEMENT ...>`
                let content_start = i + 2;
                let end = find(bytes, content_start, b">");
                yield_!(Token::Comment(&input[content_start..end.unwrap_or(len)]));
                i = end.map_or(len, |end| end + 1);
                continue;
            }
            if bytes[i + 1] == b'?' {
                let content_start = i + 2;
                match mode {
                    ParseMode::Xml => {
                        let end = find(bytes, content_start, b"?>");
                        yield_!(Token::ProcessingInstruction(
                            &input[content_start..end.unwrap_or(len)]
                        ));
                        i = end.map_or(len, |end| end + 2);
                    }
                    ParseMode::Html => {
                        let end = find(bytes, content_start, b">");
                        let content = &input[content_start..end.unwrap_or(len)];
                        yield_!(Token::ProcessingInstruction(
                            content.strip_suffix('?').unwrap_or(content)
                        ));
                        i = end.map_or(len, |end| end + 1);
                    }
                }
                continue;
            }
            if bytes[i + 1] == b'/' {
                let name_start = i + 2;
                let mut k = name_start;
                while k < len && !is_name_end(bytes[k]) {
                    k += 1;
                }
                yield_!(Token::EndTag(&input[name_start..k]));
                i = find(bytes, k, b">").map_or(len, |end| end + 1);
                continue;
            }

            let tag = scan_start_tag(input, i);
            let raw_text = mode == ParseMode::Html
                && !tag.self_closing
                && (tag.name.eq_ignore_ascii_case("script") || tag.name.eq_ignore_ascii_case("style"));
            let name = tag.name;
            i = tag.end;
            yield_!(Token::StartTag {
                name,
                attributes: tag.attributes,
                self_closing: tag.self_closing,
            });
            if raw_text {
                let end = find_raw_text_end(bytes, i, name.as_bytes()).unwrap_or(len);
                if end > i {
                    yield_!(Token::Text(&input[i..end]));
                }
                i = end;
            }
        }
    })
    .into_iter()
}
