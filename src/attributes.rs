use std::borrow::Cow;

use crate::dialect::Dialect;
use crate::entity::escape_attribute;
use crate::xmlvalue::Attributes;

const STATEMENT_INDENT: &str = "  ";

// split on `;`, where `;;` stands for a literal `;`
fn split_statements(value: &str) -> Vec<&str> {
    let bytes = value.as_bytes();
    let mut statements = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b';' {
            if bytes.get(i + 1) == Some(&b';') {
                i += 2;
                continue;
            }
            statements.push(&value[start..i]);
            start = i + 1;
        }
        i += 1;
    }
    statements.push(&value[start..]);
    statements
}

/// Put each statement of a `tal:define` style value on its own line.
///
/// ```text
/// tal:define="
///   a 1;
///   b 2;
/// "
/// ```
pub fn format_statements(value: &str) -> String {
    let mut lines = vec![String::new()];
    for statement in split_statements(value) {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        lines.push(format!("{}{};", STATEMENT_INDENT, statement));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Put each word of a value on its own line, aligned under the first word.
pub fn format_wrapped(name: &str, value: &str) -> String {
    let joiner = format!("\n{}", " ".repeat(name.chars().count() + 2));
    value.split_whitespace().collect::<Vec<_>>().join(&joiner)
}

/// Sorts and formats the attributes of one element.
///
/// Every attribute becomes one line, or several when its value is spread
/// over multiple lines. Indenting those lines under the tag is up to the
/// caller.
pub struct PrettyAttributes<'a> {
    attributes: &'a Attributes,
    dialect: &'a Dialect,
    namespace_uri: &'a str,
    tag: &'a str,
}

impl<'a> PrettyAttributes<'a> {
    /// `tag` is the local name of the element and `namespace_uri` its
    /// resolved namespace; they select the order in table-ordered dialects.
    pub fn new(
        attributes: &'a Attributes,
        dialect: &'a Dialect,
        namespace_uri: &'a str,
        tag: &'a str,
    ) -> Self {
        PrettyAttributes {
            attributes,
            dialect,
            namespace_uri,
            tag,
        }
    }

    fn format_value(&self, name: &str, value: String) -> String {
        if self.dialect.wrapped_value_attributes.contains(name) {
            format_wrapped(name, &value)
        } else if self.dialect.templating && self.dialect.multi_statement_attributes.contains(name)
        {
            format_statements(&value)
        } else if value.contains('\n') {
            // continuation lines are re-indented under the tag
            value
                .split('\n')
                .enumerate()
                .map(|(i, line)| if i == 0 { line.trim_end() } else { line.trim() })
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            value
        }
    }

    /// The formatted attributes in order.
    pub fn lines(&self) -> Vec<String> {
        let mut attributes: Vec<(&str, String)> = self
            .attributes
            .iter()
            .map(|(name, value)| (name, value.joined()))
            .collect();
        attributes.sort_by(|(a, _), (b, _)| {
            self.dialect
                .compare_attributes(self.namespace_uri, self.tag, a, b)
        });
        attributes
            .into_iter()
            .map(|(name, value)| {
                let value = self.format_value(name, value);
                if value.is_empty() && self.dialect.can_be_valueless(name) {
                    name.to_string()
                } else {
                    format!("{}=\"{}\"", name, escape_attribute(Cow::from(value)))
                }
            })
            .collect()
    }

    /// The formatted attributes, separated by newlines.
    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmlvalue::AttributeValue;

    fn render(attributes: &[(&str, AttributeValue)], dialect: &Dialect) -> String {
        let attributes: Attributes = attributes.iter().cloned().collect();
        PrettyAttributes::new(&attributes, dialect, "", "root").render()
    }

    #[test]
    fn test_no_attributes() {
        assert_eq!(render(&[], &Dialect::html()), "");
    }

    #[test]
    fn test_one_attribute() {
        assert_eq!(render(&[("a", "1".into())], &Dialect::html()), "a=\"1\"");
    }

    #[test]
    fn test_tal_define() {
        assert_eq!(
            render(&[("tal:define", "a 1; b 2".into())], &Dialect::html()),
            "tal:define=\"\n  a 1;\n  b 2;\n\""
        );
    }

    #[test]
    fn test_many_attributes() {
        assert_eq!(
            render(
                &[
                    ("a", "1".into()),
                    ("b", "2".into()),
                    ("class", vec!["hidden"].into()),
                    ("tal:define", "a 1; b 2".into()),
                ],
                &Dialect::html()
            ),
            "class=\"hidden\"\na=\"1\"\nb=\"2\"\ntal:define=\"\n  a 1;\n  b 2;\n\""
        );
    }

    #[test]
    fn test_escaped_semicolon() {
        assert_eq!(
            format_statements("a python:'x;;y'; b 2;"),
            "\n  a python:'x;;y';\n  b 2;\n"
        );
    }

    #[test]
    fn test_statements_not_formatted_in_xml() {
        assert_eq!(
            render(&[("tal:define", "a 1; b 2".into())], &Dialect::xml()),
            "tal:define=\"a 1; b 2\""
        );
    }

    #[test]
    fn test_valueless() {
        let dialect = Dialect::html();
        assert_eq!(render(&[("data-attribute", "".into())], &dialect), "data-attribute");
        assert_eq!(render(&[("hidden", "".into())], &dialect), "hidden");
        assert_eq!(render(&[("selected", "".into())], &dialect), "selected=\"\"");
        assert_eq!(render(&[("hidden", "".into())], &Dialect::xml()), "hidden=\"\"");
    }

    #[test]
    fn test_wrapped() {
        assert_eq!(
            render(&[("for", "foo  bar".into())], &Dialect::zcml()),
            "for=\"foo\n     bar\""
        );
    }

    #[test]
    fn test_escaping() {
        assert_eq!(
            render(&[("title", "a \"b\" & <c>".into())], &Dialect::html()),
            "title=\"a &quot;b&quot; &amp; &lt;c&gt;\""
        );
    }

    #[test]
    fn test_class_list_is_joined() {
        assert_eq!(
            render(&[("class", vec!["a", "b"].into())], &Dialect::html()),
            "class=\"a b\""
        );
    }
}
