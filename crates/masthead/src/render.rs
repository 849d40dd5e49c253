//! Server-side rendering of a resolved head state.
//!
//! Every snapshot field renders two ways: as a markup string (marker
//! attribute included) and as structured elements for downstream tree
//! construction. Title text and list-tag attribute values are escaped;
//! `innerHTML`/`cssText` content is emitted verbatim, never re-escaped.

use crate::MARKER_ATTRIBUTE;
use crate::dom::Element;
use crate::types::{AttrList, HeadState, TagKind, content_value, is_content_key};
use memchr::{memchr2, memchr3};
use std::borrow::Cow;

/// Escape `& < > " '` for markup text and quoted attribute values.
pub fn encode_special_characters(input: &str) -> Cow<'_, str> {
    let Some(first) = first_special(input.as_bytes()) else {
        return Cow::Borrowed(input);
    };
    let mut out = String::with_capacity(input.len() + 8);
    out.push_str(&input[..first]);
    for ch in input[first..].chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

fn first_special(bytes: &[u8]) -> Option<usize> {
    match (
        memchr3(b'&', b'<', b'>', bytes),
        memchr2(b'"', b'\'', bytes),
    ) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn is_void(kind: TagKind) -> bool {
    matches!(kind, TagKind::Base | TagKind::Meta | TagKind::Link)
}

/// `key="value"` pairs (bare key when valueless), space-separated, verbatim
/// values. Used for `<html>` and `<title>` attribute strings.
fn attributes_markup(attributes: &AttrList) -> String {
    let mut out = String::new();
    for (key, value) in attributes {
        if !out.is_empty() {
            out.push(' ');
        }
        match value {
            Some(value) => {
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(value);
                out.push('"');
            }
            None => out.push_str(key),
        }
    }
    out
}

fn title_markup(title: &str, attributes: &AttrList) -> String {
    let attrs = attributes_markup(attributes);
    let text = encode_special_characters(title);
    if attrs.is_empty() {
        format!("<title {MARKER_ATTRIBUTE}>{text}</title>")
    } else {
        format!("<title {MARKER_ATTRIBUTE} {attrs}>{text}</title>")
    }
}

fn tags_markup(kind: TagKind, tags: &[AttrList]) -> String {
    let mut out = String::new();
    for tag in tags {
        out.push('<');
        out.push_str(kind.name());
        out.push(' ');
        out.push_str(MARKER_ATTRIBUTE);
        for (key, value) in tag {
            if is_content_key(key) {
                continue;
            }
            out.push(' ');
            match value {
                Some(value) => {
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&encode_special_characters(value));
                    out.push('"');
                }
                None => out.push_str(key),
            }
        }
        out.push('>');
        if !is_void(kind) {
            out.push_str(content_value(tag).unwrap_or(""));
            out.push_str("</");
            out.push_str(kind.name());
            out.push('>');
        }
    }
    out
}

fn tag_element(kind: TagKind, tag: &AttrList) -> Element {
    let mut element = Element::new(kind.name());
    element
        .attrs
        .push((MARKER_ATTRIBUTE.to_string(), Some("true".to_string())));
    for (key, value) in tag {
        if !is_content_key(key) {
            element.attrs.push((key.clone(), value.clone()));
        }
    }
    element.content = content_value(tag).map(str::to_string);
    element
}

/// Serializable snapshot of a resolved head state, for markup generation
/// outside a live document.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadSnapshot {
    pub html_attributes: HtmlAttributesView,
    pub title: TitleView,
    pub base: TagListView,
    pub meta: TagListView,
    pub link: TagListView,
    pub script: TagListView,
    pub noscript: TagListView,
    pub style: TagListView,
}

impl HeadSnapshot {
    pub fn from_state(state: &HeadState) -> Self {
        Self {
            html_attributes: HtmlAttributesView {
                attributes: state.html_attributes.clone(),
            },
            title: TitleView {
                title: state.title.clone(),
                attributes: state.title_attributes.clone(),
            },
            base: TagListView::new(TagKind::Base, state.base_tag.clone()),
            meta: TagListView::new(TagKind::Meta, state.meta_tags.clone()),
            link: TagListView::new(TagKind::Link, state.link_tags.clone()),
            script: TagListView::new(TagKind::Script, state.script_tags.clone()),
            noscript: TagListView::new(TagKind::Noscript, state.noscript_tags.clone()),
            style: TagListView::new(TagKind::Style, state.style_tags.clone()),
        }
    }

    /// The snapshot of a state nothing ever contributed to: every field
    /// renders empty, well-formed output.
    pub fn empty() -> Self {
        Self::from_state(&HeadState::default())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HtmlAttributesView {
    attributes: AttrList,
}

impl HtmlAttributesView {
    pub fn to_markup(&self) -> String {
        attributes_markup(&self.attributes)
    }

    pub fn attributes(&self) -> &AttrList {
        &self.attributes
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TitleView {
    title: String,
    attributes: AttrList,
}

impl TitleView {
    pub fn text(&self) -> &str {
        &self.title
    }

    pub fn to_markup(&self) -> String {
        title_markup(&self.title, &self.attributes)
    }

    pub fn to_elements(&self) -> Vec<Element> {
        let mut element = Element::new("title");
        element
            .attrs
            .push((MARKER_ATTRIBUTE.to_string(), Some("true".to_string())));
        element.attrs.extend(self.attributes.iter().cloned());
        element.content = Some(self.title.clone());
        vec![element]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagListView {
    kind: TagKind,
    tags: Vec<AttrList>,
}

impl TagListView {
    fn new(kind: TagKind, tags: Vec<AttrList>) -> Self {
        Self { kind, tags }
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn tags(&self) -> &[AttrList] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn to_markup(&self) -> String {
        tags_markup(self.kind, &self.tags)
    }

    pub fn to_elements(&self) -> Vec<Element> {
        self.tags.iter().map(|t| tag_element(self.kind, t)).collect()
    }
}
