use crate::xmldata::{Node, XmlData};
use crate::xmlvalue::{AttributeValue, Value};

/// A parsed markup document.
///
/// It owns the arena with all nodes plus the root node. Create one with
/// [`Document::parse`].
pub struct Document {
    pub(crate) data: XmlData,
    pub(crate) root: Node,
}

impl Document {
    pub(crate) fn new(data: XmlData, root: Node) -> Self {
        Document { data, root }
    }

    /// The root node. It is not an element; its children are the top-level
    /// nodes of the markup.
    pub fn root(&self) -> Node {
        self.root
    }

    /// Read access to the nodes.
    pub fn data(&self) -> &XmlData {
        &self.data
    }

    /// Mutable access to the nodes.
    pub fn data_mut(&mut self) -> &mut XmlData {
        &mut self.data
    }

    /// Remove a marker from every attribute set in the document.
    ///
    /// Attributes named by the marker are dropped, and the marker is cut out
    /// of every value and list token. Tokens that become empty are dropped.
    pub(crate) fn scrub_attributes(&mut self, marker: &str) {
        let nodes: Vec<Node> = self
            .root
            .get()
            .descendants(self.data.arena())
            .map(Node::new)
            .collect();
        for node in nodes {
            if let Value::Element(element) = self.data.value_mut(node) {
                let attributes = element.attributes_mut();
                attributes.remove(marker);
                for value in attributes.values_mut() {
                    match value {
                        AttributeValue::Text(text) => {
                            if text.contains(marker) {
                                *text = text.replace(marker, "");
                            }
                        }
                        AttributeValue::List(tokens) => {
                            for token in tokens.iter_mut() {
                                if token.contains(marker) {
                                    *token = token.replace(marker, "");
                                }
                            }
                            tokens.retain(|token| !token.is_empty());
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ParseMode;

    #[test]
    fn test_scrub_attributes() {
        let mut document = Document::parse(
            "<a zpretty-blank-0 class=\"x zpretty-blank-0\" title=\"zpretty-blank-0y\"></a>",
            ParseMode::Html,
        );
        document.scrub_attributes("zpretty-blank-0");
        let data = document.data();
        let a = data.first_child(document.root()).unwrap();
        let attributes: Vec<_> = data.element(a).unwrap().attributes().iter().collect();
        assert_eq!(
            attributes,
            vec![
                ("class", &AttributeValue::from(vec!["x"])),
                ("title", &AttributeValue::from("y")),
            ]
        );
    }
}
