#![forbid(unsafe_code)]

//! Opinionated pretty-printing for HTML, XML and ZCML documents.
//!
//! The entry point is [`Prettifier`], or [`prettify`] for one-off use. A
//! [`Dialect`] decides how a document is read and how it is rendered.
//!
//! ```rust
//! use zpretty::{prettify, Dialect};
//!
//! assert_eq!(
//!     prettify("<root><input></root>", &Dialect::html()),
//!     "<root><input /></root>\n"
//! );
//! ```
mod access;
mod attributes;
mod dialect;
mod document;
mod encoding;
mod entity;
mod error;
mod manipulation;
mod parse;
mod placeholder;
mod prettifier;
mod render;
mod text;
mod tokenizer;
mod xmldata;
mod xmlvalue;
pub mod zcml;

#[cfg(feature = "proptest")]
pub mod proptest;

pub use attributes::{format_statements, format_wrapped, PrettyAttributes};
pub use dialect::{
    AttributeIndent, AttributeOrder, BooleanAttributes, Dialect, DialectKind, PreserveWhitespace,
    SelfClosing, SelfClosingPolicy,
};
pub use document::Document;
pub use encoding::{decode, encode, for_label};
pub use entity::{escape_attribute, escape_text, is_reference_at};
pub use error::Error;
pub use parse::ParseMode;
pub use prettifier::{prettify, Prettifier};
pub use render::{render_content, render_text, Renderer};
pub use text::{ends_with_whitespace, lstrip_first_line, rstrip_last_line, starts_with_whitespace};
pub use xmldata::{Node, XmlData};
pub use xmlvalue::{
    AttributeValue, Attributes, Comment, Doctype, Element, ProcessingInstruction, Text, Value,
    ValueType,
};
