//! Reversible substitutions that shield parts of the source from the parser.
//!
//! Blank lines, existing character references, CDATA sections and the
//! doctype declaration are replaced by sentinel tokens before parsing, and
//! put back into the rendered text afterwards.
use std::sync::LazyLock;

use regex::Regex;

use crate::dialect::Dialect;
use crate::entity::is_reference_at;

static CDATA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[.*?\]\]>").unwrap());
static DOCTYPE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<!DOCTYPE[^>\[]*(\[.*?\])?[^>]*>").unwrap());

/// A token of the form `zpretty-<label>-<n>` that does not occur in `source`.
pub(crate) fn sentinel(source: &str, label: &str) -> String {
    let mut n = 0usize;
    loop {
        let token = format!("zpretty-{}-{}", label, n);
        if !source.contains(&token) {
            return token;
        }
        n += 1;
    }
}

#[derive(Debug)]
pub(crate) struct Placeholders {
    blank: String,
    amp: String,
    doctype: Option<(String, String)>,
    cdata: Option<(String, Vec<String>)>,
}

impl Placeholders {
    /// Protect the source, returning the substitutions and the text to parse.
    pub(crate) fn protect(source: &str, dialect: &Dialect) -> (Placeholders, String) {
        let blank = sentinel(source, "blank");
        let amp = sentinel(source, "amp");
        let mut text = source.to_string();

        let cdata = if dialect.preserve_cdata {
            let captures: Vec<String> = CDATA_PATTERN
                .find_iter(&text)
                .map(|found| found.as_str().to_string())
                .collect();
            if captures.is_empty() {
                None
            } else {
                let marker = sentinel(source, "cdata");
                text = CDATA_PATTERN
                    .replace_all(&text, regex::NoExpand(&marker))
                    .into_owned();
                Some((marker, captures))
            }
        } else {
            None
        };

        let found = DOCTYPE_PATTERN
            .find(&text)
            .map(|found| (found.range(), found.as_str().to_string()));
        let doctype = match found {
            Some((range, original)) => {
                let marker = sentinel(source, "doctype");
                text.replace_range(range, &format!("<!DOCTYPE {}>", marker));
                Some((marker, original))
            }
            None => None,
        };

        let text = text
            .lines()
            .map(|line| {
                if line.trim().is_empty() {
                    blank.as_str()
                } else {
                    line
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        let text = protect_references(&text, &amp);

        log::trace!("placeholders: blank {:?}, ampersand {:?}", blank, amp);
        (
            Placeholders {
                blank,
                amp,
                doctype,
                cdata,
            },
            text,
        )
    }

    /// The sentinel standing in for blank lines.
    pub(crate) fn blank(&self) -> &str {
        &self.blank
    }

    /// Undo every substitution in rendered text.
    pub(crate) fn restore(&self, rendered: &str) -> String {
        let mut text = rendered.replace(&self.blank, "");
        if let Some((marker, original)) = &self.doctype {
            text = text.replacen(&format!("<!DOCTYPE {}>", marker), original, 1);
        }
        if let Some((marker, captures)) = &self.cdata {
            let mut restored = String::with_capacity(text.len());
            for (i, part) in text.split(marker.as_str()).enumerate() {
                if i > 0 {
                    restored.push_str(captures.get(i - 1).map_or(marker.as_str(), String::as_str));
                }
                restored.push_str(part);
            }
            text = restored;
        }
        text.replace(&self.amp, "&")
    }
}

// swap the `&` of every character or entity reference for the sentinel
fn protect_references(text: &str, amp: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for (index, _) in text.match_indices('&') {
        if is_reference_at(text, index) {
            result.push_str(&text[last..index]);
            result.push_str(amp);
            last = index + 1;
        }
    }
    result.push_str(&text[last..]);
    result
}
