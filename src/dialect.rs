//! Formatting dialects.
//!
//! A [`Dialect`] holds every policy that differs between plain HTML (with
//! TAL/METAL/i18n templating), XML, and ZCML. All of them are public fields,
//! so you can start from one of the constructors and adjust.
use std::cmp::Ordering;
use std::path::Path;

use ahash::{HashMap, HashSet, HashSetExt};

use crate::parse::ParseMode;
use crate::zcml;

const VOID_ELEMENTS: [&str; 17] = [
    "area", "base", "basefont", "br", "col", "embed", "frame", "hr", "img", "input", "keygen",
    "link", "meta", "param", "source", "track", "wbr",
];

const BOOLEAN_ATTRIBUTES: [&str; 11] = [
    "hidden",
    "required",
    "checked",
    "disabled",
    "readonly",
    "multiple",
    "autofocus",
    "novalidate",
    "formnovalidate",
    "async",
    "defer",
];

const TAL_ATTRIBUTE_ORDER: [&str; 10] = [
    "define",
    "switch",
    "condition",
    "repeat",
    "case",
    "content",
    "replace",
    "omit-tag",
    "attributes",
    "on-error",
];

const I18N_ATTRIBUTES: [&str; 11] = [
    "i18n:translate",
    "i18n:domain",
    "i18n:context",
    "i18n:source",
    "i18n:target",
    "i18n:name",
    "i18n:attributes",
    "i18n:data",
    "i18n:comment",
    "i18n:ignore",
    "i18n:ignore-attributes",
];

const MULTI_STATEMENT_ATTRIBUTES: [&str; 4] =
    ["attributes", "define", "tal:attributes", "tal:define"];

const PRESERVE_WHITESPACE: [&str; 4] = ["pre", "script", "style", "textarea"];

fn strings(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Which dialect this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DialectKind {
    /// HTML soup, possibly with TAL/METAL/i18n templating.
    Html,
    /// Strict XML.
    Xml,
    /// XML following the ZCML style guide.
    Zcml,
}

/// When an element may render as `<tag />`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelfClosingPolicy {
    /// Only childless void elements and childless `tal:`/`metal:` elements.
    /// A void element with children must be repaired first.
    VoidAndTemplating,
    /// Any childless element.
    Childless,
}

/// The outcome of classifying an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfClosing {
    /// Render as `<tag />`.
    SelfClosing,
    /// A void element that has children; they have to be moved out first.
    NeedsRepair,
    /// Render as `<tag></tag>`.
    OpenClose,
}

/// Attributes that may be written without a value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BooleanAttributes {
    /// Names that may lose an empty value.
    pub names: HashSet<String>,
    /// Whether any `data-*` attribute may lose an empty value.
    pub data_attributes: bool,
}

/// How attributes are sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeOrder {
    /// Semantic buckets: namespace declarations, `class`/`id`, the rest,
    /// `data-*`, TAL in execution order, i18n.
    Semantic,
    /// An order per `(namespace URI, local tag name)`. Unlisted pairs use
    /// the fallback order; attributes in neither list go last.
    Table {
        by_tag: HashMap<(String, String), Vec<String>>,
        fallback: Vec<String>,
    },
}

/// Which elements keep their single text child verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PreserveWhitespace {
    /// Only elements with these names.
    Elements(HashSet<String>),
    /// Every element.
    All,
}

/// Where continuation lines of a multi-line start tag are indented to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeIndent {
    /// Align attributes under the first one, which stays on the tag line.
    AlignWithTag,
    /// Put every attribute on its own line, indented by this many spaces.
    Fixed(usize),
}

/// The formatting policies of a dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dialect {
    pub kind: DialectKind,
    pub parse_mode: ParseMode,
    pub void_elements: HashSet<String>,
    pub self_closing: SelfClosingPolicy,
    pub boolean_attributes: Option<BooleanAttributes>,
    /// TAL and i18n sort buckets apply.
    pub templating: bool,
    /// `;` separated attributes that get one statement per line.
    pub multi_statement_attributes: HashSet<String>,
    /// Attributes whose whitespace separated words get one line each.
    pub wrapped_value_attributes: HashSet<String>,
    pub attribute_order: AttributeOrder,
    pub preserve_whitespace: PreserveWhitespace,
    /// Compose tag names as `prefix:name`.
    pub qualified_tag_names: bool,
    pub attribute_indent: AttributeIndent,
    /// Put before the `>` or `/>` of a multi-line start tag.
    pub before_closing_multiline: String,
    /// Prepend `<?xml ...?>` when rendering a whole document that lacks one.
    pub xml_declaration: bool,
    /// Keep `<![CDATA[...]]>` sections verbatim.
    pub preserve_cdata: bool,
}

impl Dialect {
    /// The default HTML dialect.
    pub fn html() -> Self {
        Dialect {
            kind: DialectKind::Html,
            parse_mode: ParseMode::Html,
            void_elements: strings(&VOID_ELEMENTS),
            self_closing: SelfClosingPolicy::VoidAndTemplating,
            boolean_attributes: Some(BooleanAttributes {
                names: strings(&BOOLEAN_ATTRIBUTES),
                data_attributes: true,
            }),
            templating: true,
            multi_statement_attributes: strings(&MULTI_STATEMENT_ATTRIBUTES),
            wrapped_value_attributes: HashSet::new(),
            attribute_order: AttributeOrder::Semantic,
            preserve_whitespace: PreserveWhitespace::Elements(strings(&PRESERVE_WHITESPACE)),
            qualified_tag_names: false,
            attribute_indent: AttributeIndent::AlignWithTag,
            before_closing_multiline: String::new(),
            xml_declaration: false,
            preserve_cdata: false,
        }
    }

    /// The default XML dialect.
    pub fn xml() -> Self {
        Dialect {
            kind: DialectKind::Xml,
            parse_mode: ParseMode::Xml,
            void_elements: HashSet::new(),
            self_closing: SelfClosingPolicy::Childless,
            boolean_attributes: None,
            templating: false,
            multi_statement_attributes: HashSet::new(),
            wrapped_value_attributes: HashSet::new(),
            attribute_order: AttributeOrder::Table {
                by_tag: HashMap::default(),
                fallback: Vec::new(),
            },
            preserve_whitespace: PreserveWhitespace::All,
            qualified_tag_names: true,
            attribute_indent: AttributeIndent::AlignWithTag,
            before_closing_multiline: String::new(),
            xml_declaration: true,
            preserve_cdata: false,
        }
    }

    /// The ZCML dialect.
    pub fn zcml() -> Self {
        Dialect {
            kind: DialectKind::Zcml,
            wrapped_value_attributes: strings(&["for"]),
            attribute_order: zcml::attribute_order(),
            attribute_indent: AttributeIndent::Fixed(4),
            before_closing_multiline: "    ".to_string(),
            ..Self::xml()
        }
    }

    /// The default dialect of a kind.
    pub fn from_kind(kind: DialectKind) -> Self {
        match kind {
            DialectKind::Html => Self::html(),
            DialectKind::Xml => Self::xml(),
            DialectKind::Zcml => Self::zcml(),
        }
    }

    /// Pick a dialect by file extension: `.xml` and `.zcml` get their
    /// dialects, anything else is HTML.
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.to_ascii_lowercase());
        match extension.as_deref() {
            Some("xml") => Self::xml(),
            Some("zcml") => Self::zcml(),
            _ => Self::html(),
        }
    }

    /// Decide how an element renders.
    pub fn classify(&self, tag: &str, has_children: bool) -> SelfClosing {
        match self.self_closing {
            SelfClosingPolicy::Childless => {
                if has_children {
                    SelfClosing::OpenClose
                } else {
                    SelfClosing::SelfClosing
                }
            }
            SelfClosingPolicy::VoidAndTemplating => {
                let void = self.void_elements.contains(tag);
                if has_children {
                    if void {
                        SelfClosing::NeedsRepair
                    } else {
                        SelfClosing::OpenClose
                    }
                } else if void || tag.starts_with("tal:") || tag.starts_with("metal:") {
                    SelfClosing::SelfClosing
                } else {
                    SelfClosing::OpenClose
                }
            }
        }
    }

    /// Does this element keep a lone text child verbatim?
    pub fn preserves_whitespace(&self, tag: &str) -> bool {
        match &self.preserve_whitespace {
            PreserveWhitespace::All => true,
            PreserveWhitespace::Elements(names) => names.contains(tag),
        }
    }

    /// May this attribute drop an empty value?
    pub fn can_be_valueless(&self, name: &str) -> bool {
        match &self.boolean_attributes {
            Some(boolean) => {
                (boolean.data_attributes && name.starts_with("data-"))
                    || boolean.names.contains(name)
            }
            None => false,
        }
    }

    fn sort_bucket(&self, namespace_uri: &str, tag: &str, name: &str) -> usize {
        if name.starts_with("xmlns") {
            return 0;
        }
        match &self.attribute_order {
            AttributeOrder::Semantic => {
                if name == "class" || name == "id" {
                    return 100;
                }
                if name.starts_with("data") {
                    return 300;
                }
                if self.templating {
                    let tal_name = name.strip_prefix("tal:").unwrap_or(name);
                    if let Some(index) = TAL_ATTRIBUTE_ORDER.iter().position(|n| *n == tal_name)
                    {
                        return 400 + index;
                    }
                    if I18N_ATTRIBUTES.contains(&name) {
                        return 900;
                    }
                }
                200
            }
            AttributeOrder::Table { by_tag, fallback } => {
                let order = by_tag
                    .get(&(namespace_uri.to_string(), tag.to_string()))
                    .unwrap_or(fallback);
                match order.iter().position(|n| n == name) {
                    Some(index) => 100 + index,
                    None => 1000,
                }
            }
        }
    }

    /// Compare two attribute names of an element.
    ///
    /// `tag` is the local name and `namespace_uri` the resolved namespace of
    /// the element; only table ordering uses them.
    pub fn compare_attributes(&self, namespace_uri: &str, tag: &str, a: &str, b: &str) -> Ordering {
        let a_key = (self.sort_bucket(namespace_uri, tag, a), a);
        let b_key = (self.sort_bucket(namespace_uri, tag, b), b);
        a_key.cmp(&b_key)
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sorted(dialect: &Dialect, names: &[&'static str]) -> Vec<&'static str> {
        let mut names = names.to_vec();
        names.sort_by(|a, b| dialect.compare_attributes("", "a", a, b));
        names
    }

    #[test]
    fn test_semantic_order() {
        let dialect = Dialect::html();
        assert_eq!(
            sorted(
                &dialect,
                &[
                    "i18n:translate",
                    "tal:content",
                    "data-b",
                    "href",
                    "id",
                    "class",
                    "xmlns:tal",
                    "define",
                    "tal:condition",
                ]
            ),
            vec![
                "xmlns:tal",
                "class",
                "id",
                "href",
                "data-b",
                "define",
                "tal:condition",
                "tal:content",
                "i18n:translate",
            ]
        );
    }

    #[test]
    fn test_table_order() {
        let dialect = Dialect::zcml();
        assert_eq!(
            sorted(&dialect, &["handler", "for", "name", "xmlns"]),
            vec!["xmlns", "name", "for", "handler"]
        );
    }

    #[rstest]
    #[case("input", true, SelfClosing::NeedsRepair)]
    #[case("input", false, SelfClosing::SelfClosing)]
    #[case("div", false, SelfClosing::OpenClose)]
    #[case("div", true, SelfClosing::OpenClose)]
    #[case("tal:block", false, SelfClosing::SelfClosing)]
    #[case("metal:slot", false, SelfClosing::SelfClosing)]
    #[case("tal:block", true, SelfClosing::OpenClose)]
    fn test_classify_html(#[case] tag: &str, #[case] has_children: bool, #[case] expected: SelfClosing) {
        assert_eq!(Dialect::html().classify(tag, has_children), expected);
    }

    #[rstest]
    #[case("input", true, SelfClosing::OpenClose)]
    #[case("div", false, SelfClosing::SelfClosing)]
    fn test_classify_xml(#[case] tag: &str, #[case] has_children: bool, #[case] expected: SelfClosing) {
        assert_eq!(Dialect::xml().classify(tag, has_children), expected);
    }

    #[test]
    fn test_can_be_valueless() {
        let dialect = Dialect::html();
        assert!(dialect.can_be_valueless("hidden"));
        assert!(dialect.can_be_valueless("data-attribute"));
        assert!(!dialect.can_be_valueless("selected"));
        assert!(!dialect.can_be_valueless("database"));
        assert!(!Dialect::xml().can_be_valueless("hidden"));
    }

    #[rstest]
    #[case("index.html", DialectKind::Html)]
    #[case("configure.zcml", DialectKind::Zcml)]
    #[case("profiles/default/metadata.XML", DialectKind::Xml)]
    #[case("-", DialectKind::Html)]
    fn test_for_path(#[case] path: &str, #[case] expected: DialectKind) {
        assert_eq!(Dialect::for_path(path).kind, expected);
    }

    #[test]
    fn test_preserves_whitespace() {
        assert!(Dialect::html().preserves_whitespace("pre"));
        assert!(!Dialect::html().preserves_whitespace("div"));
        assert!(Dialect::zcml().preserves_whitespace("configure"));
    }
}
