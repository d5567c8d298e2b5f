use genawaiter::rc::gen;
use genawaiter::yield_;
use xmlparser::{ElementEnd, Token as XmlToken, Tokenizer};

use crate::document::Document;
use crate::tokenizer::{tokenize, Token};
use crate::xmldata::{Node, XmlData};
use crate::xmlvalue::AttributeValue;

/// How markup is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseMode {
    /// Forgiving HTML parsing: lowercased names, raw text in `script` and
    /// `style`, multi-valued attributes split into lists.
    Html,
    /// XML parsing: names keep their case and prefixes are split off.
    Xml,
}

// attributes that hold a whitespace separated list of tokens
fn is_list_attribute(tag: &str, attribute: &str) -> bool {
    match attribute {
        "class" | "accesskey" | "dropzone" => true,
        "rel" | "rev" => matches!(tag, "a" | "link" | "area"),
        "headers" => matches!(tag, "td" | "th"),
        _ => false,
    }
}

fn split_prefix(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => {
            (Some(prefix), local)
        }
        _ => (None, name),
    }
}

struct DocumentBuilder {
    data: XmlData,
    root: Node,
    open: Vec<(Node, String)>,
    mode: ParseMode,
}

impl DocumentBuilder {
    fn new(mode: ParseMode) -> Self {
        let mut data = XmlData::new();
        let root = data.new_root();
        DocumentBuilder {
            data,
            root,
            open: Vec::new(),
            mode,
        }
    }

    fn current(&self) -> Node {
        self.open.last().map_or(self.root, |(node, _)| *node)
    }

    fn add(&mut self, node: Node) {
        let parent = self.current();
        self.data.append(parent, node);
    }

    fn start_tag(&mut self, name: &str, attributes: Vec<(&str, Option<&str>)>, self_closing: bool) {
        let node = match self.mode {
            ParseMode::Html => {
                let name = name.to_ascii_lowercase();
                let node = self.data.new_element(&name, None);
                if let Some(element) = self.data.element_mut(node) {
                    for (attribute, value) in attributes {
                        let attribute = attribute.to_ascii_lowercase();
                        let value = value.unwrap_or("");
                        let value = if is_list_attribute(&name, &attribute) {
                            AttributeValue::List(
                                value.split_whitespace().map(String::from).collect(),
                            )
                        } else {
                            AttributeValue::Text(value.to_string())
                        };
                        element.attributes_mut().insert(attribute, value);
                    }
                }
                node
            }
            ParseMode::Xml => {
                let (prefix, local) = split_prefix(name);
                let node = self.data.new_element(local, prefix);
                if let Some(element) = self.data.element_mut(node) {
                    for (attribute, value) in attributes {
                        element
                            .attributes_mut()
                            .insert(attribute, value.unwrap_or(""));
                    }
                }
                node
            }
        };
        self.add(node);
        if !self_closing {
            let key = match self.mode {
                ParseMode::Html => name.to_ascii_lowercase(),
                ParseMode::Xml => name.to_string(),
            };
            self.open.push((node, key));
        }
    }

    fn end_tag(&mut self, name: &str) {
        let key = match self.mode {
            ParseMode::Html => name.to_ascii_lowercase(),
            ParseMode::Xml => name.to_string(),
        };
        // close the nearest match and everything opened after it
        if let Some(index) = self.open.iter().rposition(|(_, open)| *open == key) {
            self.open.truncate(index);
        }
    }

    fn token(&mut self, token: Token) {
        match token {
            Token::Text(text) | Token::Cdata(text) => {
                if !text.is_empty() {
                    let node = self.data.new_text(text);
                    self.add(node);
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => self.start_tag(name, attributes, self_closing),
            Token::EndTag(name) => {
                if !name.is_empty() {
                    self.end_tag(name)
                }
            }
            Token::Comment(text) => {
                let node = self.data.new_comment(text);
                self.add(node);
            }
            Token::Doctype(text) => {
                let node = self.data.new_doctype(text);
                self.add(node);
            }
            Token::ProcessingInstruction(text) => {
                let node = self.data.new_processing_instruction(text);
                self.add(node);
            }
        }
    }

    fn build(self) -> Document {
        Document::new(self.data, self.root)
    }
}

// the qualified name covered by a prefix and a local span
fn qualified<'a>(xml: &'a str, prefix: xmlparser::StrSpan<'a>, local: xmlparser::StrSpan<'a>) -> &'a str {
    if prefix.as_str().is_empty() {
        local.as_str()
    } else {
        &xml[prefix.start()..local.end()]
    }
}

/// Tokens of a strict XML parse, in the shape the lenient tokenizer uses.
///
/// Whitespace between top-level tokens, which `xmlparser` skips, is
/// reported as text. Iteration stops after the first error.
fn strict_tokens(xml: &str) -> impl Iterator<Item = Result<Token<'_>, xmlparser::Error>> + '_ {
    gen!({
        let mut last_end = 0;
        let mut in_markup = false;
        let mut dtd_start = None;
        let mut start_tag: Option<(&str, Vec<(&str, Option<&str>)>)> = None;

        for token in Tokenizer::from(xml) {
            let token = match token {
                Ok(token) => token,
                Err(e) => {
                    yield_!(Err(e));
                    return;
                }
            };
            let span = match token {
                XmlToken::Declaration { span, .. }
                | XmlToken::ProcessingInstruction { span, .. }
                | XmlToken::Comment { span, .. }
                | XmlToken::DtdStart { span, .. }
                | XmlToken::EmptyDtd { span, .. }
                | XmlToken::EntityDeclaration { span, .. }
                | XmlToken::DtdEnd { span }
                | XmlToken::ElementStart { span, .. }
                | XmlToken::Attribute { span, .. }
                | XmlToken::ElementEnd { span, .. }
                | XmlToken::Cdata { span, .. } => span,
                XmlToken::Text { text } => text,
            };
            if !in_markup && span.start() > last_end {
                yield_!(Ok(Token::Text(&xml[last_end..span.start()])));
            }
            last_end = span.end();

            match token {
                XmlToken::Declaration { span, .. } | XmlToken::ProcessingInstruction { span, .. } => {
                    let content = span.as_str();
                    yield_!(Ok(Token::ProcessingInstruction(
                        &content[2..content.len() - 2]
                    )));
                }
                XmlToken::Comment { text, .. } => {
                    yield_!(Ok(Token::Comment(text.as_str())));
                }
                XmlToken::EmptyDtd { span, .. } => {
                    let content = span.as_str();
                    yield_!(Ok(Token::Doctype(content[9..content.len() - 1].trim())));
                }
                XmlToken::DtdStart { span, .. } => {
                    in_markup = true;
                    dtd_start = Some(span.start());
                }
                XmlToken::EntityDeclaration { .. } => {}
                XmlToken::DtdEnd { span } => {
                    in_markup = false;
                    if let Some(start) = dtd_start.take() {
                        yield_!(Ok(Token::Doctype(xml[start + 9..span.end() - 1].trim())));
                    }
                }
                XmlToken::ElementStart { prefix, local, .. } => {
                    in_markup = true;
                    start_tag = Some((qualified(xml, prefix, local), Vec::new()));
                }
                XmlToken::Attribute {
                    prefix,
                    local,
                    value,
                    ..
                } => {
                    if let Some((_, attributes)) = start_tag.as_mut() {
                        attributes.push((qualified(xml, prefix, local), Some(value.as_str())));
                    }
                }
                XmlToken::ElementEnd { end, .. } => {
                    in_markup = false;
                    match end {
                        ElementEnd::Open | ElementEnd::Empty => {
                            if let Some((name, attributes)) = start_tag.take() {
                                yield_!(Ok(Token::StartTag {
                                    name,
                                    attributes,
                                    self_closing: end == ElementEnd::Empty,
                                }));
                            }
                        }
                        ElementEnd::Close(prefix, local) => {
                            yield_!(Ok(Token::EndTag(qualified(xml, prefix, local))));
                        }
                    }
                }
                XmlToken::Text { text } => {
                    yield_!(Ok(Token::Text(text.as_str())));
                }
                XmlToken::Cdata { text, .. } => {
                    yield_!(Ok(Token::Cdata(text.as_str())));
                }
            }
        }
        if last_end < xml.len() {
            yield_!(Ok(Token::Text(&xml[last_end..])));
        }
    })
    .into_iter()
}

impl Document {
    /// Parse markup into a document.
    ///
    /// This never fails. In [`ParseMode::Xml`] the text is first parsed as
    /// well-formed XML; when that fails it is parsed again, forgivingly.
    pub fn parse(text: &str, mode: ParseMode) -> Document {
        if mode == ParseMode::Xml {
            match parse_strict(text) {
                Ok(document) => return document,
                Err(e) => log::debug!("not well-formed XML ({}), recovering", e),
            }
        }
        let mut builder = DocumentBuilder::new(mode);
        for token in tokenize(text, mode) {
            builder.token(token);
        }
        builder.build()
    }
}

fn parse_strict(xml: &str) -> Result<Document, xmlparser::Error> {
    let mut builder = DocumentBuilder::new(ParseMode::Xml);
    for token in strict_tokens(xml) {
        builder.token(token?);
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmlvalue::{Value, ValueType};

    fn child_types(document: &Document, node: Node) -> Vec<ValueType> {
        document
            .data()
            .children(node)
            .map(|child| document.data().value_type(child))
            .collect()
    }

    #[test]
    fn test_html_lowercases_and_splits_class() {
        let document = Document::parse("<DIV Class=\"a  b\" ID=x></div>", ParseMode::Html);
        let data = document.data();
        let div = data.first_child(document.root()).unwrap();
        let element = data.element(div).unwrap();
        assert_eq!(element.name(), "div");
        assert_eq!(
            element.attributes().get("class"),
            Some(&AttributeValue::from(vec!["a", "b"]))
        );
        assert_eq!(
            element.attributes().get("id"),
            Some(&AttributeValue::from("x"))
        );
    }

    #[test]
    fn test_html_void_element_keeps_children() {
        let document = Document::parse("<input><a /><b /></input>", ParseMode::Html);
        let data = document.data();
        let input = data.first_child(document.root()).unwrap();
        assert_eq!(
            child_types(&document, input),
            vec![ValueType::Element, ValueType::Element]
        );
    }

    #[test]
    fn test_unmatched_end_tag_is_ignored() {
        let document = Document::parse("<p>a</span>b</p>", ParseMode::Html);
        let data = document.data();
        let p = data.first_child(document.root()).unwrap();
        assert_eq!(child_types(&document, p), vec![ValueType::Text, ValueType::Text]);
    }

    #[test]
    fn test_end_tag_closes_inner_elements() {
        let document = Document::parse("<div><p>a</div>b", ParseMode::Html);
        let data = document.data();
        assert_eq!(
            child_types(&document, document.root()),
            vec![ValueType::Element, ValueType::Text]
        );
        let div = data.first_child(document.root()).unwrap();
        assert_eq!(child_types(&document, div), vec![ValueType::Element]);
    }

    #[test]
    fn test_xml_strict_prefix() {
        let document = Document::parse(
            "<configure xmlns:browser=\"b\"><browser:page name=\"x\"/></configure>",
            ParseMode::Xml,
        );
        let data = document.data();
        let configure = data.first_child(document.root()).unwrap();
        let page = data.first_child(configure).unwrap();
        let element = data.element(page).unwrap();
        assert_eq!(element.prefix(), Some("browser"));
        assert_eq!(element.name(), "page");
        assert_eq!(data.namespace_uri(page), "b");
    }

    #[test]
    fn test_xml_document_level_whitespace() {
        let document = Document::parse("<?xml version=\"1.0\"?>\n<a/>\n", ParseMode::Xml);
        let data = document.data();
        assert_eq!(
            child_types(&document, document.root()),
            vec![
                ValueType::ProcessingInstruction,
                ValueType::Text,
                ValueType::Element,
                ValueType::Text
            ]
        );
        let pi = data.first_child(document.root()).unwrap();
        match data.value(pi) {
            Value::ProcessingInstruction(pi) => assert_eq!(pi.get(), "xml version=\"1.0\""),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_xml_recovers() {
        // two top-level elements are not well-formed
        let document = Document::parse("<a>x</a><B y='1'>", ParseMode::Xml);
        let data = document.data();
        assert_eq!(
            child_types(&document, document.root()),
            vec![ValueType::Element, ValueType::Element]
        );
        let b = data.last_child(document.root()).unwrap();
        assert_eq!(data.element(b).unwrap().name(), "B");
    }

    #[test]
    fn test_doctype() {
        let document = Document::parse("<!DOCTYPE html>\n<html></html>", ParseMode::Html);
        let data = document.data();
        let doctype = data.first_child(document.root()).unwrap();
        match data.value(doctype) {
            Value::Doctype(doctype) => assert_eq!(doctype.get(), "html"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_xml_empty_dtd() {
        let document = Document::parse("<!DOCTYPE root><root/>", ParseMode::Xml);
        let data = document.data();
        let doctype = data.first_child(document.root()).unwrap();
        match data.value(doctype) {
            Value::Doctype(doctype) => assert_eq!(doctype.get(), "root"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_xml_cdata_becomes_text() {
        let document = Document::parse("<a><![CDATA[<b>]]></a>", ParseMode::Xml);
        let data = document.data();
        let a = data.first_child(document.root()).unwrap();
        let text = data.first_child(a).unwrap();
        assert_eq!(data.text_str(text), Some("<b>"));
    }
}
