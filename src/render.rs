//! The element renderer.
//!
//! Every node is rendered into a string whose indentation depends on its
//! nesting level. Siblings are then stitched together by looking only at
//! the first and last lines of their output: a line break between two
//! siblings sits either at the end of the first or at the start of the
//! second, never at both.
//!
//! The traversal keeps its own stack, so deeply nested documents do not
//! exhaust the call stack.
use std::borrow::Cow;

use ahash::HashMap;

use crate::attributes::PrettyAttributes;
use crate::dialect::{AttributeIndent, Dialect, SelfClosing};
use crate::document::Document;
use crate::entity::escape_text;
use crate::parse::ParseMode;
use crate::text::{ends_with_whitespace, lstrip_first_line, rstrip_last_line, starts_with_whitespace};
use crate::xmldata::Node;
use crate::xmlvalue::{Element, Value, ValueType};

const INDENT: &str = "  ";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

fn indentation(level: i32) -> String {
    INDENT.repeat(level.max(0) as usize)
}

/// Render a text node.
///
/// Leading whitespace becomes a line break plus indentation, trailing
/// whitespace becomes a single line break. Inner lines only lose trailing
/// whitespace.
pub fn render_text(text: &str, level: i32) -> String {
    let prefix = indentation(level);
    let lines: Vec<&str> = text.split('\n').collect();

    if let [line] = lines.as_slice() {
        if line.trim().is_empty() {
            return "\n".to_string();
        }
        let mut line = line.to_string();
        if starts_with_whitespace(&line) {
            line = format!("\n{}{}", prefix, line.trim_start());
        }
        if ends_with_whitespace(&line) {
            line = format!("{}\n", line.trim_end());
        }
        return line;
    }

    let mut rendered = String::with_capacity(text.len() + prefix.len());
    let first = lines[0];
    if first.trim().is_empty() {
        rendered.push('\n');
    } else if starts_with_whitespace(first) {
        rendered.push('\n');
        rendered.push_str(&prefix);
        rendered.push_str(first.trim());
        rendered.push('\n');
    } else {
        rendered.push_str(first.trim_end());
        rendered.push('\n');
    }

    for line in &lines[1..lines.len() - 1] {
        if !line.trim().is_empty() {
            rendered.push_str(line.trim_end());
        }
        rendered.push('\n');
    }

    // the last line keeps its indentation and only gets a line break when
    // it had trailing whitespace, as a single line would
    let last = lines[lines.len() - 1];
    if !last.trim().is_empty() {
        rendered.push_str(last.trim_end());
        if ends_with_whitespace(last) {
            rendered.push('\n');
        }
    }
    rendered
}

/// Join the rendered children of an element.
///
/// Each part comes with a flag telling whether its node is text.
pub fn render_content<'a>(parts: impl IntoIterator<Item = (bool, Cow<'a, str>)>) -> String {
    let mut joined: Vec<String> = Vec::new();
    let mut previous_ends_with_whitespace = false;
    for (is_text, part) in parts {
        let ends = ends_with_whitespace(&part);
        if is_text || !previous_ends_with_whitespace {
            joined.push(lstrip_first_line(&part));
        } else {
            if let Some(last) = joined.last_mut() {
                *last = rstrip_last_line(last);
            }
            joined.push(part.into_owned());
        }
        previous_ends_with_whitespace = ends;
    }
    let content = joined.concat();
    if ends_with_whitespace(&content) {
        rstrip_last_line(&content)
    } else {
        content
    }
}

enum Visit {
    Enter(Node, i32),
    Exit(Node, i32),
}

/// Renders a parsed document with a dialect.
///
/// Rendering can move nodes: a void element that has children gets them
/// moved out to become its following siblings.
pub struct Renderer<'a> {
    document: &'a mut Document,
    dialect: &'a Dialect,
}

impl<'a> Renderer<'a> {
    pub fn new(document: &'a mut Document, dialect: &'a Dialect) -> Self {
        Renderer { document, dialect }
    }

    fn tag_name(&self, element: &Element) -> String {
        if self.dialect.qualified_tag_names {
            element.qualified_name()
        } else {
            element.name().to_string()
        }
    }

    fn classify(&self, node: Node) -> Option<SelfClosing> {
        let data = self.document.data();
        let element = data.element(node)?;
        Some(
            self.dialect
                .classify(&self.tag_name(element), data.has_children(node)),
        )
    }

    /// The children of a node, after repairing void elements among them.
    fn child_nodes(&mut self, node: Node) -> Vec<Node> {
        loop {
            let children: Vec<Node> = self.document.data().children(node).collect();
            let broken = children
                .iter()
                .copied()
                .find(|child| self.classify(*child) == Some(SelfClosing::NeedsRepair));
            match broken {
                Some(child) => {
                    if let Some(element) = self.document.data().element(child) {
                        log::debug!("void element <{}> has children, moving them out", element.name());
                    }
                    self.document.data_mut().hoist_children(child);
                }
                None => return children,
            }
        }
    }

    // the raw text of an element that keeps its lone text child verbatim
    fn preserved_text(&self, node: Node, children: &[Node]) -> Option<&str> {
        let data = self.document.data();
        let element = data.element(node)?;
        if !self.dialect.preserves_whitespace(&self.tag_name(element)) {
            return None;
        }
        match children {
            [child] => data.text_str(*child),
            _ => None,
        }
    }

    /// Render a node and everything under it.
    ///
    /// `top` renders as the bare concatenation of its children at level -1,
    /// which makes them come out unindented. It is either the document root
    /// or an element wrapped around markup without a single root.
    pub fn render(&mut self, top: Node) -> String {
        let mut children: HashMap<Node, Vec<Node>> = HashMap::default();
        let mut rendered: HashMap<Node, String> = HashMap::default();
        let mut stack = vec![Visit::Enter(top, -1)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(node, level) => {
                    stack.push(Visit::Exit(node, level));
                    if !matches!(
                        self.document.data().value_type(node),
                        ValueType::Root | ValueType::Element
                    ) {
                        continue;
                    }
                    let nodes = self.child_nodes(node);
                    if node == top || self.preserved_text(node, &nodes).is_none() {
                        for child in nodes.iter().rev() {
                            stack.push(Visit::Enter(*child, level + 1));
                        }
                    }
                    children.insert(node, nodes);
                }
                Visit::Exit(node, level) => {
                    let nodes = children.remove(&node).unwrap_or_default();
                    let mut parts = Vec::with_capacity(nodes.len());
                    for child in &nodes {
                        parts.push(rendered.remove(child).unwrap_or_default());
                    }
                    let output = if node == top {
                        self.render_top(node, &nodes, parts)
                    } else {
                        self.render_node(node, level, &nodes, parts)
                    };
                    rendered.insert(node, output);
                }
            }
        }
        rendered.remove(&top).unwrap_or_default()
    }

    fn content(&self, nodes: &[Node], parts: Vec<String>) -> String {
        let data = self.document.data();
        render_content(
            nodes
                .iter()
                .zip(parts)
                .map(|(node, part)| (data.value_type(*node) == ValueType::Text, Cow::from(part))),
        )
    }

    fn render_top(&self, node: Node, nodes: &[Node], parts: Vec<String>) -> String {
        let content = self.content(nodes, parts);
        let data = self.document.data();
        if data.value_type(node) != ValueType::Root || !self.dialect.xml_declaration {
            return content;
        }
        let declared = nodes.first().is_some_and(|first| match data.value(*first) {
            Value::Doctype(_) => true,
            Value::ProcessingInstruction(pi) => pi.target() == "xml",
            _ => false,
        });
        if declared {
            content
        } else {
            format!("{}\n{}", XML_DECLARATION, content)
        }
    }

    fn render_node(&self, node: Node, level: i32, nodes: &[Node], parts: Vec<String>) -> String {
        let prefix = indentation(level);
        match self.document.data().value(node) {
            Value::Root => self.content(nodes, parts),
            Value::Comment(comment) => format!("{}<!--{}-->", prefix, comment.get()),
            Value::Doctype(doctype) => format!("{}<!DOCTYPE {}>", prefix, doctype.get()),
            Value::ProcessingInstruction(pi) => format!("{}<?{}?>", prefix, pi.get()),
            Value::Text(text) => render_text(&escape_text(text.get().into()), level),
            Value::Element(element) => {
                if nodes.is_empty() && self.classify(node) == Some(SelfClosing::SelfClosing) {
                    self.render_self_closing(node, element, &prefix)
                } else {
                    self.render_open_close(node, element, &prefix, nodes, parts)
                }
            }
        }
    }

    // the attributes as they go right after the tag name, and whether they
    // span several lines
    fn render_attributes(&self, node: Node, element: &Element, tag: &str, prefix: &str) -> (String, bool) {
        let namespace_uri = self.document.data().namespace_uri(node);
        let attributes = PrettyAttributes::new(
            element.attributes(),
            self.dialect,
            &namespace_uri,
            element.name(),
        )
        .render();
        if attributes.is_empty() {
            return (attributes, false);
        }
        if !attributes.contains('\n') {
            return (format!(" {}", attributes), false);
        }
        let continuation = match self.dialect.attribute_indent {
            AttributeIndent::AlignWithTag => " ".repeat(tag.chars().count() + 2),
            AttributeIndent::Fixed(width) => " ".repeat(width),
        };
        let joiner = format!("\n{}{}", prefix, continuation);
        let mut indented = String::new();
        for (i, line) in attributes.lines().enumerate() {
            if i > 0 {
                if line.is_empty() {
                    indented.push('\n');
                } else {
                    indented.push_str(&joiner);
                }
            }
            indented.push_str(line);
        }
        let indented = match self.dialect.attribute_indent {
            AttributeIndent::AlignWithTag => format!(" {}", indented),
            AttributeIndent::Fixed(_) => format!("{}{}", joiner, indented),
        };
        (indented, true)
    }

    fn render_self_closing(&self, node: Node, element: &Element, prefix: &str) -> String {
        let tag = self.tag_name(element);
        let (attributes, multiline) = self.render_attributes(node, element, &tag, prefix);
        if multiline {
            format!(
                "{}<{}{}\n{}{}/>",
                prefix, tag, attributes, prefix, self.dialect.before_closing_multiline
            )
        } else {
            format!("{}<{}{} />", prefix, tag, attributes)
        }
    }

    fn render_open_close(
        &self,
        node: Node,
        element: &Element,
        prefix: &str,
        nodes: &[Node],
        parts: Vec<String>,
    ) -> String {
        let tag = self.tag_name(element);
        let (attributes, multiline) = self.render_attributes(node, element, &tag, prefix);
        let open_tag = if multiline {
            format!(
                "{}<{}{}\n{}{}>",
                prefix, tag, attributes, prefix, self.dialect.before_closing_multiline
            )
        } else {
            format!("{}<{}{}>", prefix, tag, attributes)
        };

        if let Some(text) = self.preserved_text(node, nodes) {
            let text = match self.dialect.parse_mode {
                ParseMode::Html => Cow::from(text),
                ParseMode::Xml => escape_text(text.into()),
            };
            return format!("{}{}</{}>", open_tag, text, tag);
        }

        let mut content = self.content(nodes, parts);
        let close_tag = if ends_with_whitespace(&content) {
            if !content.ends_with('\n') {
                content = rstrip_last_line(&content);
                content.push('\n');
            }
            format!("{}</{}>", prefix, tag)
        } else {
            format!("</{}>", tag)
        };
        format!("{}{}{}", open_tag, content, close_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(" a", 0, "\na")]
    #[case(" ", 0, "\n")]
    #[case("\n", 0, "\n")]
    #[case("a ", 0, "a\n")]
    #[case(" a ", 1, "\n  a\n")]
    #[case("a", 3, "a")]
    #[case("\n    Hello!   \n", 1, "\n    Hello!\n")]
    #[case("a\n  ", 1, "a\n")]
    #[case(" a\nb", 1, "\n  a\nb")]
    #[case("a  \n\n  b \nc", 0, "a\n\n  b\nc")]
    #[case("a\n  b", 0, "a\n  b")]
    #[case("a\n  b ", 0, "a\n  b\n")]
    #[case("\n  y", 1, "\n  y")]
    fn test_render_text(#[case] text: &str, #[case] level: i32, #[case] expected: &str) {
        assert_eq!(render_text(text, level), expected);
    }

    #[test]
    fn test_render_content_moves_line_break() {
        let parts = vec![
            (true, Cow::from("\n  a\n")),
            (false, Cow::from("  <div></div>")),
            (true, Cow::from("\n")),
        ];
        assert_eq!(render_content(parts), "\n  a\n  <div></div>\n");
    }

    #[test]
    fn test_render_content_fuses_inline() {
        let parts = vec![
            (false, Cow::from("  <tal:test />")),
            (true, Cow::from("a")),
        ];
        assert_eq!(render_content(parts), "<tal:test />a");
    }

    #[test]
    fn test_render_text_is_stable_after_a_sibling() {
        let once = render_text(" y", 1);
        assert_eq!(once, "\n  y");
        assert_eq!(render_text(&once, 1), once);
    }

    #[test]
    fn test_render_content_empty() {
        assert_eq!(render_content(Vec::<(bool, Cow<str>)>::new()), "");
    }
}
