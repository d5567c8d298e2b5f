/// What kind of node a [`Value`] is, without its content.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ValueType {
    /// The root of a parsed document.
    Root,
    /// Element; it has a name, an optional prefix and attributes.
    Element,
    /// Text.
    Text,
    /// Comment.
    Comment,
    /// Document type declaration.
    Doctype,
    /// Processing instruction, including the `<?xml ...?>` declaration.
    ProcessingInstruction,
}

/// A markup value.
#[derive(Debug, Clone)]
pub enum Value {
    /// The root of a parsed document. Its children are the top-level nodes,
    /// so there may be more than one element among them.
    Root,
    /// Element; it has a name, an optional prefix and attributes.
    Element(Element),
    /// Text.
    Text(Text),
    /// Comment.
    Comment(Comment),
    /// Document type declaration.
    Doctype(Doctype),
    /// Processing instruction.
    ProcessingInstruction(ProcessingInstruction),
}

impl Value {
    /// Returns the type of the value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Root => ValueType::Root,
            Value::Element(_) => ValueType::Element,
            Value::Text(_) => ValueType::Text,
            Value::Comment(_) => ValueType::Comment,
            Value::Doctype(_) => ValueType::Doctype,
            Value::ProcessingInstruction(_) => ValueType::ProcessingInstruction,
        }
    }
}

/// The value of an attribute.
///
/// Some HTML attributes, like `class`, hold a whitespace separated list.
/// The parser splits those into a [`AttributeValue::List`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// A plain string value.
    Text(String),
    /// A list of tokens.
    List(Vec<String>),
}

impl AttributeValue {
    /// The value as a single string; list tokens are joined by a space.
    pub fn joined(&self) -> String {
        match self {
            AttributeValue::Text(value) => value.clone(),
            AttributeValue::List(values) => values.join(" "),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(values: Vec<&str>) -> Self {
        AttributeValue::List(values.into_iter().map(String::from).collect())
    }
}

/// Attributes in the order they were first seen.
///
/// Setting an attribute that already exists replaces its value but keeps
/// its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, AttributeValue)>,
}

impl Attributes {
    /// Create an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Get an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Remove an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterate over names and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterate mutably over the values.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut AttributeValue> {
        self.entries.iter_mut().map(|(_, value)| value)
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No attributes at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<AttributeValue>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

/// Element value.
///
/// Example: `<foo/>` or `<tal:block define="x 1">`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) prefix: Option<String>,
    pub(crate) attributes: Attributes,
}

impl Element {
    pub(crate) fn new(name: String, prefix: Option<String>) -> Self {
        Element {
            name,
            prefix,
            attributes: Attributes::new(),
        }
    }

    /// The local name of the element.
    ///
    /// In HTML mode a name like `tal:block` is not split, so this is the
    /// whole name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The namespace prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The name including its prefix, as written in the source.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }

    /// The attributes of the element.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the attributes of the element.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// Text node.
///
/// The content is kept as it appears in the source; character references
/// are not decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub(crate) text: String,
}

impl Text {
    pub(crate) fn new(text: String) -> Self {
        Text { text }
    }

    /// Get the text.
    pub fn get(&self) -> &str {
        &self.text
    }
}

/// Comment node. The content excludes `<!--` and `-->`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub(crate) text: String,
}

impl Comment {
    pub(crate) fn new(text: String) -> Self {
        Comment { text }
    }

    /// Get the comment text.
    pub fn get(&self) -> &str {
        &self.text
    }
}

/// Document type declaration. The content is what follows `<!DOCTYPE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctype {
    pub(crate) text: String,
}

impl Doctype {
    pub(crate) fn new(text: String) -> Self {
        Doctype { text }
    }

    /// Get the declaration content, e.g. `html`.
    pub fn get(&self) -> &str {
        &self.text
    }
}

/// Processing instruction. The content is what sits between `<?` and `?>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    pub(crate) text: String,
}

impl ProcessingInstruction {
    pub(crate) fn new(text: String) -> Self {
        ProcessingInstruction { text }
    }

    /// Get the instruction content, e.g. `xml version="1.0"`.
    pub fn get(&self) -> &str {
        &self.text
    }

    /// The target, which is the first word of the content.
    pub fn target(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }
}
