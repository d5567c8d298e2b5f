use crate::xmldata::{Node, XmlData};
use crate::xmlvalue::{Element, Value};

/// ## Read-only access
impl XmlData {
    /// Get parent node.
    ///
    /// Returns [`None`] for a root node or a detached node.
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].parent().map(Node::new)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().children(self.arena()).map(Node::new)
    }

    /// First child of a node.
    pub fn first_child(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].first_child().map(Node::new)
    }

    /// Last child of a node.
    pub fn last_child(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].last_child().map(Node::new)
    }

    /// Next sibling of a node.
    pub fn next_sibling(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].next_sibling().map(Node::new)
    }

    /// Previous sibling of a node.
    pub fn previous_sibling(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].previous_sibling().map(Node::new)
    }

    /// Ancestors of a node, starting with the node itself.
    pub fn ancestors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().ancestors(self.arena()).map(Node::new)
    }

    /// Does the node have any children?
    pub fn has_children(&self, node: Node) -> bool {
        self.first_child(node).is_some()
    }

    /// Get the element value if this node is an element.
    pub fn element(&self, node: Node) -> Option<&Element> {
        match self.value(node) {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Get a mutable element value if this node is an element.
    pub fn element_mut(&mut self, node: Node) -> Option<&mut Element> {
        match self.value_mut(node) {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Get the text content if this node is a text node.
    pub fn text_str(&self, node: Node) -> Option<&str> {
        match self.value(node) {
            Value::Text(text) => Some(text.get()),
            _ => None,
        }
    }

    /// Resolve the namespace URI of an element.
    ///
    /// This walks the ancestors looking for an `xmlns` declaration (or
    /// `xmlns:prefix` for a prefixed element). Returns the empty string when
    /// nothing is declared.
    pub fn namespace_uri(&self, node: Node) -> String {
        let declaration = match self.element(node).and_then(Element::prefix) {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        self.ancestors(node)
            .filter_map(|ancestor| self.element(ancestor))
            .find_map(|element| element.attributes().get(&declaration))
            .map(|value| value.joined())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_uri() {
        let mut data = XmlData::new();
        let configure = data.new_element("configure", None);
        if let Some(element) = data.element_mut(configure) {
            element
                .attributes_mut()
                .insert("xmlns", "http://namespaces.zope.org/zope");
            element
                .attributes_mut()
                .insert("xmlns:browser", "http://namespaces.zope.org/browser");
        }
        let page = data.new_element("page", Some("browser"));
        let adapter = data.new_element("adapter", None);
        let other = data.new_element("thing", Some("other"));
        data.append(configure, page);
        data.append(page, adapter);
        data.append(page, other);
        assert_eq!(
            data.namespace_uri(page),
            "http://namespaces.zope.org/browser"
        );
        assert_eq!(
            data.namespace_uri(adapter),
            "http://namespaces.zope.org/zope"
        );
        assert_eq!(data.namespace_uri(other), "");
    }

    #[test]
    fn test_navigation() {
        let mut data = XmlData::new();
        let root = data.new_root();
        let a = data.new_element("a", None);
        let b = data.new_text("b");
        data.append(root, a);
        data.append(root, b);
        assert_eq!(data.first_child(root), Some(a));
        assert_eq!(data.last_child(root), Some(b));
        assert_eq!(data.next_sibling(a), Some(b));
        assert_eq!(data.previous_sibling(b), Some(a));
        assert_eq!(data.parent(a), Some(root));
        assert_eq!(data.text_str(b), Some("b"));
        assert!(data.element(b).is_none());
        assert!(!data.has_children(a));
    }
}
