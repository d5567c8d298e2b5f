use indextree::{Arena, NodeId};

use crate::xmlvalue::{
    Comment, Doctype, Element, ProcessingInstruction, Text, Value, ValueType,
};

pub(crate) type MarkupArena = Arena<Value>;

/// A node in a markup tree.
///
/// This is a lightweight handle; use it with the [`XmlData`] it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(NodeId);

impl Node {
    #[inline]
    pub(crate) fn new(node_id: NodeId) -> Self {
        Node(node_id)
    }

    #[inline]
    pub(crate) fn get(&self) -> NodeId {
        self.0
    }
}

/// The arena that owns all nodes of a parsed document.
pub struct XmlData {
    pub(crate) arena: MarkupArena,
}

impl XmlData {
    pub fn new() -> Self {
        XmlData {
            arena: MarkupArena::new(),
        }
    }

    #[inline]
    pub(crate) fn arena(&self) -> &MarkupArena {
        &self.arena
    }

    #[inline]
    pub(crate) fn arena_mut(&mut self) -> &mut MarkupArena {
        &mut self.arena
    }

    #[inline]
    pub fn value(&self, node: Node) -> &Value {
        self.arena[node.0].get()
    }

    #[inline]
    pub fn value_mut(&mut self, node: Node) -> &mut Value {
        self.arena[node.0].get_mut()
    }

    #[inline]
    pub fn value_type(&self, node: Node) -> ValueType {
        self.value(node).value_type()
    }

    fn new_node(&mut self, value: Value) -> Node {
        Node::new(self.arena.new_node(value))
    }

    /// Create a new, unattached root node.
    pub fn new_root(&mut self) -> Node {
        self.new_node(Value::Root)
    }

    /// Create a new, unattached element node.
    pub fn new_element(&mut self, name: &str, prefix: Option<&str>) -> Node {
        self.new_node(Value::Element(Element::new(
            name.to_string(),
            prefix.map(String::from),
        )))
    }

    /// Create a new, unattached text node.
    pub fn new_text(&mut self, text: &str) -> Node {
        self.new_node(Value::Text(Text::new(text.to_string())))
    }

    /// Create a new, unattached comment node.
    pub fn new_comment(&mut self, comment: &str) -> Node {
        self.new_node(Value::Comment(Comment::new(comment.to_string())))
    }

    /// Create a new, unattached doctype node.
    pub fn new_doctype(&mut self, content: &str) -> Node {
        self.new_node(Value::Doctype(Doctype::new(content.to_string())))
    }

    /// Create a new, unattached processing instruction node.
    pub fn new_processing_instruction(&mut self, content: &str) -> Node {
        self.new_node(Value::ProcessingInstruction(ProcessingInstruction::new(
            content.to_string(),
        )))
    }
}

impl Default for XmlData {
    fn default() -> Self {
        Self::new()
    }
}
