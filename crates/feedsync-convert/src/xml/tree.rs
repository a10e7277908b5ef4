//! In-memory XML element tree
//!
//! Each node keeps three separate slots: attributes, child elements and
//! character data. Children stay in document order, so a repeated element is
//! never collapsed into a single value.

/// A parsed XML document with exactly one root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }

    /// Follow a chain of child names starting at the root element.
    ///
    /// `path[0]` must name the root itself. Returns `None` as soon as one step
    /// is missing. Only the first matching child is followed at each level.
    pub fn find(&self, path: &[&str]) -> Option<&XmlElement> {
        let (first, rest) = path.split_first()?;
        if self.root.name != *first {
            return None;
        }
        rest.iter()
            .try_fold(&self.root, |element, name| element.child(name))
    }
}

/// One XML element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    /// Unescaped character data (text and CDATA), trimmed
    pub text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Element holding only character data
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn push_child(&mut self, child: XmlElement) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn push_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Every child element with the given name, in document order.
    ///
    /// This is the one place where cardinality is normalized: a field that
    /// appears once, many times or not at all always comes back as a list.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text of the first child with the given name, `None` if that child is absent
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.as_str())
    }

    /// Children of the `group` child named `item`, or nothing when `group` is absent.
    ///
    /// Covers wrapper layouts like `<Resimler><Resim/>...</Resimler>`.
    pub fn grouped<'a>(&'a self, group: &str, item: &'a str) -> Vec<&'a XmlElement> {
        self.child(group)
            .map(|wrapper| wrapper.children_named(item).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.is_empty()
    }
}
