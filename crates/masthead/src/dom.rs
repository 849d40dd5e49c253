//! Owned document model for the parts of a page this crate manages: the
//! `<html>` element's attributes, the `<title>` element, and the children of
//! `<head>`. Hosts embed the [`Document`] and read it back after each
//! reconciliation pass; there are no platform DOM handles here.

use crate::types::AttrList;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: AttrList,
    pub content: Option<String>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            content: None,
        }
    }

    /// First attribute value whose key matches case-insensitively.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    pub fn set_attr(&mut self, key: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == key) {
            slot.1 = Some(value.to_string());
        } else {
            self.attrs.push((key.to_string(), Some(value.to_string())));
        }
    }

    pub fn remove_attr(&mut self, key: &str) {
        self.attrs.retain(|(k, _)| k != key);
    }

    /// Structural equality: tag name (ASCII case-insensitive), attribute
    /// multiset (order-insensitive), and content. Used to decide whether an
    /// already-applied node can be kept as-is.
    pub fn same_shape(&self, other: &Element) -> bool {
        if !self.name.eq_ignore_ascii_case(&other.name) || self.content != other.content {
            return false;
        }
        if self.attrs.len() != other.attrs.len() {
            return false;
        }
        self.attrs
            .iter()
            .all(|attr| count_of(&self.attrs, attr) == count_of(&other.attrs, attr))
    }
}

fn count_of(attrs: &AttrList, attr: &(String, Option<String>)) -> usize {
    attrs.iter().filter(|a| *a == attr).count()
}

/// The managed portion of a live document.
#[derive(Clone, Debug)]
pub struct Document {
    pub html: Element,
    pub title: Element,
    head: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            html: Element::new("html"),
            title: Element::new("title"),
            head: Vec::new(),
        }
    }

    pub fn head(&self) -> &[Element] {
        &self.head
    }

    pub(crate) fn head_mut(&mut self) -> &mut Vec<Element> {
        &mut self.head
    }

    pub fn title_text(&self) -> &str {
        self.title.content.as_deref().unwrap_or("")
    }

    /// Insert a head child the way an external mutator would; reconciliation
    /// leaves elements without the marker attribute alone.
    pub fn append_head_child(&mut self, element: Element) {
        self.head.push(element);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
