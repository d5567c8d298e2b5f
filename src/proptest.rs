//! Proptest support for zpretty
//!
//! Generates markup for property tests, for instance to check that
//! prettifying is idempotent.
//!
//! This can be enabled by adding the `proptest` feature to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! zpretty = { version = "0.1", features = ["proptest"] }
//! ```
//!
//! See the [`proptest`](https://docs.rs/proptest/latest/proptest/)
//! documentation for more information.

use std::fmt;

use ahash::HashSet;
use proptest::prelude::*;

const ELEMENT_NAMES: &[&str] = &["div", "span", "p", "tal:block", "metal:slot", "x"];
const ATTRIBUTE_NAMES: &[&str] = &["id", "class", "href", "data-x", "tal:content", "title"];
const ATTRIBUTE_VALUE: &str = "[a-z0-9]{0,5}";
const WORD: &str = "[a-zA-Z0-9.,!]{1,8}";
const COMMENT: &str = "[a-z]{0,8}";

/// A generated piece of markup.
#[derive(Debug, Clone)]
pub enum Markup {
    /// Text without whitespace
    Text(String),
    /// A comment
    Comment(String),
    /// An element with attributes and children
    Element {
        /// The tag name
        name: String,
        /// Attributes, each name at most once
        attributes: Vec<(String, String)>,
        /// The content
        children: Vec<Markup>,
    },
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Markup::Text(text) => f.write_str(text),
            Markup::Comment(comment) => write!(f, "<!--{}-->", comment),
            Markup::Element {
                name,
                attributes,
                children,
            } => {
                write!(f, "<{}", name)?;
                for (name, value) in attributes {
                    write!(f, " {}=\"{}\"", name, value)?;
                }
                f.write_str(">")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                write!(f, "</{}>", name)
            }
        }
    }
}

fn arb_attribute() -> impl Strategy<Value = (String, String)> {
    (prop::sample::select(ATTRIBUTE_NAMES), ATTRIBUTE_VALUE)
        .prop_map(|(name, value)| (name.to_string(), value))
}

fn unduplicate_attributes(attributes: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut seen = HashSet::default();
    attributes
        .into_iter()
        .filter(|(name, _)| seen.insert(name.clone()))
        .collect()
}

fn arb_content() -> impl Strategy<Value = Markup> {
    let leaf = prop_oneof![
        WORD.prop_map(Markup::Text),
        COMMENT.prop_map(Markup::Comment),
    ];

    leaf.prop_recursive(
        6,  // levels deep
        64, // maximum size of 64 nodes
        5,  // up to 5 items per collection
        |inner| {
            (
                prop::sample::select(ELEMENT_NAMES),
                prop::collection::vec(arb_attribute(), 0..4),
                prop::collection::vec(inner, 0..5),
            )
                .prop_map(|(name, attributes, children)| Markup::Element {
                    name: name.to_string(),
                    attributes: unduplicate_attributes(attributes),
                    children,
                })
        },
    )
}

/// Generate a markup fragment of elements, words and comments.
///
/// The fragment contains no whitespace and no void elements, so it reads
/// the same in the HTML and the XML dialect.
///
/// Example:
///
/// ```notrust
/// use proptest::prelude::*;
/// use zpretty::proptest::arb_markup;
/// use zpretty::{prettify, Dialect};
///
/// proptest! {
///   #[test]
///   fn test_idempotent(markup in arb_markup()) {
///     let once = prettify(&markup, &Dialect::html());
///     prop_assert_eq!(prettify(&once, &Dialect::html()), once);
///   }
/// }
/// ```
pub fn arb_markup() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_content(), 0..4).prop_map(|content| {
        content
            .iter()
            .map(|markup| markup.to_string())
            .collect::<String>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::prettifier::prettify;

    proptest! {
        #[test]
        fn test_arb_markup_is_stable(markup in arb_markup()) {
            let once = prettify(&markup, &Dialect::html());
            prop_assert_eq!(prettify(&once, &Dialect::html()), once);
        }
    }

    #[test]
    fn test_display() {
        let markup = Markup::Element {
            name: "p".to_string(),
            attributes: vec![("id".to_string(), "a".to_string())],
            children: vec![
                Markup::Text("b".to_string()),
                Markup::Comment("c".to_string()),
            ],
        };
        assert_eq!(markup.to_string(), "<p id=\"a\">b<!--c--></p>");
    }
}
