use std::collections::{BTreeSet, HashMap};

/// DOM-like node: an id, a set of attribute names and a text value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    id: String,
    attributes: BTreeSet<String>,
    pub value: String,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// `None` for an empty id, so an anonymous node never matches.
    pub fn id(&self) -> Option<&str> {
        Some(self.id.as_str()).filter(|id| !id.is_empty())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }
}

/// Mutable access to the elements of a page by id.
pub trait Page {
    fn element_mut(&mut self, id: &str) -> Option<&mut Element>;
}

/// In-memory page keyed by element id.
#[derive(Debug, Default)]
pub struct Document {
    elements: HashMap<String, Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an element. Elements without an id are dropped.
    pub fn insert(&mut self, element: Element) {
        if let Some(id) = element.id() {
            self.elements.insert(id.to_string(), element);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.get(id).map(|element| element.value.as_str())
    }

    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.value = value.into();
                true
            }
            None => false,
        }
    }
}

impl Page for Document {
    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }
}
