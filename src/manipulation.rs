use crate::xmldata::{Node, XmlData};

/// Manipulation of the tree structure.
///
/// Markup handed to the prettifier is often not well-formed, so unlike a
/// strict XML tree there are no structural checks here: any node can hold
/// any other node. Adjacent text nodes are not consolidated either, as the
/// renderer relies on seeing them as they were tokenized.
impl XmlData {
    /// Append a child to the end of the children of the given parent.
    ///
    /// The child must not be an ancestor of the parent.
    pub fn append(&mut self, parent: Node, child: Node) {
        parent.get().append(child.get(), self.arena_mut());
    }

    /// Insert a new sibling after a reference node.
    pub fn insert_after(&mut self, reference_node: Node, new_sibling: Node) {
        reference_node
            .get()
            .insert_after(new_sibling.get(), self.arena_mut());
    }

    /// Detach a node (and its descendants) from the tree.
    ///
    /// It now becomes a new fragment.
    pub fn detach(&mut self, node: Node) {
        node.get().detach(self.arena_mut());
    }

    /// Move all children of a node out to follow it as siblings.
    ///
    /// Their order is kept. The node itself ends up childless.
    pub fn hoist_children(&mut self, node: Node) {
        let children: Vec<Node> = self.children(node).collect();
        let mut anchor = node;
        for child in children {
            self.detach(child);
            self.insert_after(anchor, child);
            anchor = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hoist_children() {
        let mut data = XmlData::new();
        let root = data.new_root();
        let input = data.new_element("input", None);
        let a = data.new_element("a", None);
        let b = data.new_element("b", None);
        let after = data.new_text("after");
        data.append(root, input);
        data.append(root, after);
        data.append(input, a);
        data.append(input, b);

        data.hoist_children(input);

        assert!(!data.has_children(input));
        let children: Vec<Node> = data.children(root).collect();
        assert_eq!(children, vec![input, a, b, after]);
    }

    #[test]
    fn test_detach() {
        let mut data = XmlData::new();
        let root = data.new_root();
        let a = data.new_element("a", None);
        data.append(root, a);
        data.detach(a);
        assert!(!data.has_children(root));
        assert_eq!(data.parent(a), None);
    }
}
