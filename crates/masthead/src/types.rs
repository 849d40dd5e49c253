use crate::dom::Element;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Ordered attribute list for one tag. Order is the order the declaration
/// supplied the attributes; `None` marks a valueless (boolean) attribute.
pub type AttrList = Vec<(String, Option<String>)>;

/// The head tag kinds managed as deduplicated lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagKind {
    Base,
    Meta,
    Link,
    Script,
    Noscript,
    Style,
}

impl TagKind {
    pub const ALL: [TagKind; 6] = [
        TagKind::Base,
        TagKind::Meta,
        TagKind::Link,
        TagKind::Script,
        TagKind::Noscript,
        TagKind::Style,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TagKind::Base => "base",
            TagKind::Meta => "meta",
            TagKind::Link => "link",
            TagKind::Script => "script",
            TagKind::Noscript => "noscript",
            TagKind::Style => "style",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-kind tag elements added or removed by one reconciliation pass. Kinds
/// with no changes are absent.
pub type TagChanges = BTreeMap<TagKind, Vec<Element>>;

/// User callback invoked after every live reconciliation with the resolved
/// state and the elements that were actually added and removed.
pub type ChangeCallback = Rc<dyn Fn(&HeadState, &TagChanges, &TagChanges)>;

/// One component instance's desired head contribution.
///
/// Tag entries in `meta`/`link`/`script`/`noscript`/`style` are attribute
/// lists; the literal keys `innerHTML` and `cssText` carry textual tag
/// content. An empty tag list is equivalent to an absent one.
#[derive(Clone, Default)]
pub struct HeadProps {
    pub html_attributes: AttrList,
    pub title: Option<String>,
    pub title_template: Option<String>,
    pub default_title: Option<String>,
    pub title_attributes: AttrList,
    pub base: Option<AttrList>,
    pub meta: Vec<AttrList>,
    pub link: Vec<AttrList>,
    pub script: Vec<AttrList>,
    pub noscript: Vec<AttrList>,
    pub style: Vec<AttrList>,
    pub on_change_client_state: Option<ChangeCallback>,
}

impl HeadProps {
    pub fn tag_list(&self, kind: TagKind) -> &[AttrList] {
        match kind {
            TagKind::Base => self.base.as_slice(),
            TagKind::Meta => &self.meta,
            TagKind::Link => &self.link,
            TagKind::Script => &self.script,
            TagKind::Noscript => &self.noscript,
            TagKind::Style => &self.style,
        }
    }
}

impl fmt::Debug for HeadProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadProps")
            .field("html_attributes", &self.html_attributes)
            .field("title", &self.title)
            .field("title_template", &self.title_template)
            .field("default_title", &self.default_title)
            .field("title_attributes", &self.title_attributes)
            .field("base", &self.base)
            .field("meta", &self.meta)
            .field("link", &self.link)
            .field("script", &self.script)
            .field("noscript", &self.noscript)
            .field("style", &self.style)
            .field(
                "on_change_client_state",
                &self.on_change_client_state.is_some(),
            )
            .finish()
    }
}

impl PartialEq for HeadProps {
    fn eq(&self, other: &Self) -> bool {
        // Callbacks compare by identity; everything else structurally.
        let callbacks_eq = match (&self.on_change_client_state, &other.on_change_client_state) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        callbacks_eq
            && self.html_attributes == other.html_attributes
            && self.title == other.title
            && self.title_template == other.title_template
            && self.default_title == other.default_title
            && self.title_attributes == other.title_attributes
            && self.base == other.base
            && self.meta == other.meta
            && self.link == other.link
            && self.script == other.script
            && self.noscript == other.noscript
            && self.style == other.style
    }
}

/// The canonical resolved head state produced from an ordered declaration
/// list. `base_tag` holds at most one tag; `title` is always present,
/// defaulting to the empty string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadState {
    pub html_attributes: AttrList,
    pub title: String,
    pub title_attributes: AttrList,
    pub base_tag: Vec<AttrList>,
    pub meta_tags: Vec<AttrList>,
    pub link_tags: Vec<AttrList>,
    pub script_tags: Vec<AttrList>,
    pub noscript_tags: Vec<AttrList>,
    pub style_tags: Vec<AttrList>,
}

impl HeadState {
    pub fn tags(&self, kind: TagKind) -> &[AttrList] {
        match kind {
            TagKind::Base => &self.base_tag,
            TagKind::Meta => &self.meta_tags,
            TagKind::Link => &self.link_tags,
            TagKind::Script => &self.script_tags,
            TagKind::Noscript => &self.noscript_tags,
            TagKind::Style => &self.style_tags,
        }
    }
}

/// First attribute whose key matches `key` case-insensitively, with a value.
pub fn attr_value<'a>(attrs: &'a AttrList, key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .and_then(|(_, v)| v.as_deref())
}

pub(crate) fn is_content_key(key: &str) -> bool {
    key == "innerHTML" || key == "cssText"
}

/// Textual content carried by a tag mapping, `innerHTML` taking precedence
/// over `cssText`. A valueless content key yields empty content.
pub(crate) fn content_value(tag: &AttrList) -> Option<&str> {
    tag.iter()
        .find(|(k, _)| k == "innerHTML")
        .or_else(|| tag.iter().find(|(k, _)| k == "cssText"))
        .map(|(_, v)| v.as_deref().unwrap_or(""))
}
