use std::cell::OnceCell;

use crate::dialect::Dialect;
use crate::document::Document;
use crate::encoding::decode;
use crate::error::Error;
use crate::placeholder::{sentinel, Placeholders};
use crate::render::Renderer;
use crate::xmlvalue::ValueType;

/// Prettifies one document.
///
/// ```rust
/// use zpretty::Prettifier;
///
/// let prettifier = Prettifier::html("<root> a <div /> </root>");
/// assert_eq!(prettifier.render(), "<root>\n  a\n  <div></div>\n</root>\n");
/// assert!(!prettifier.check());
/// ```
pub struct Prettifier {
    source: String,
    dialect: Dialect,
    rendered: OnceCell<String>,
}

impl Prettifier {
    /// Create a prettifier for source text with a dialect.
    pub fn new(source: impl Into<String>, dialect: Dialect) -> Self {
        Prettifier {
            source: source.into(),
            dialect,
            rendered: OnceCell::new(),
        }
    }

    /// Create a prettifier using the HTML dialect.
    pub fn html(source: impl Into<String>) -> Self {
        Self::new(source, Dialect::html())
    }

    /// Create a prettifier using the XML dialect.
    pub fn xml(source: impl Into<String>) -> Self {
        Self::new(source, Dialect::xml())
    }

    /// Create a prettifier using the ZCML dialect.
    pub fn zcml(source: impl Into<String>) -> Self {
        Self::new(source, Dialect::zcml())
    }

    /// Create a prettifier from raw bytes.
    ///
    /// Without an encoding label the encoding is detected, see
    /// [`decode`](crate::decode).
    pub fn from_bytes(bytes: &[u8], encoding: Option<&str>, dialect: Dialect) -> Result<Self, Error> {
        Ok(Self::new(decode(bytes, encoding)?, dialect))
    }

    /// The source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The dialect in use.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// The prettified text. It is computed on first use.
    pub fn render(&self) -> String {
        self.rendered
            .get_or_init(|| prettify(&self.source, &self.dialect))
            .clone()
    }

    /// Is the source already pretty?
    pub fn check(&self) -> bool {
        self.render() == self.source
    }
}

/// Prettify source text with a dialect.
pub fn prettify(source: &str, dialect: &Dialect) -> String {
    log::trace!("prettifying as {:?}", dialect.kind);
    let (placeholders, text) = Placeholders::protect(source, dialect);

    // a document that opens with a doctype or a processing instruction is
    // rendered from its root; anything else gets wrapped
    let lookahead = Document::parse(&text, dialect.parse_mode);
    let declared = lookahead
        .data()
        .first_child(lookahead.root())
        .is_some_and(|first| {
            matches!(
                lookahead.data().value_type(first),
                ValueType::Doctype | ValueType::ProcessingInstruction
            )
        });
    let (mut document, top) = if declared {
        let root = lookahead.root();
        (lookahead, Some(root))
    } else {
        let wrapper = sentinel(source, "root");
        let document = Document::parse(
            &format!("<{}>{}</{}>", wrapper, text, wrapper),
            dialect.parse_mode,
        );
        let top = document.data().first_child(document.root());
        (document, top)
    };

    let top = match top {
        Some(top) if document.data().has_children(top) => top,
        _ => {
            log::debug!("nothing to prettify, keeping the source");
            return source.to_string();
        }
    };

    document.scrub_attributes(placeholders.blank());
    let rendered = Renderer::new(&mut document, dialect).render(top);
    let mut prettified = placeholders.restore(&rendered).trim_end().to_string();
    prettified.push('\n');
    prettified
}
