//! Reconciliation of a resolved [`HeadState`] against a live [`Document`].
//!
//! Contract:
//! - Only elements carrying the marker attribute are owned by this crate;
//!   foreign head children are never touched.
//! - Matching is structural: a target tag that already exists keeps its
//!   node, so applying the same state twice mutates nothing.
//! - `<html>` and `<title>` reconcile attribute-by-attribute; the marker
//!   attribute's comma-joined value tracks which keys this crate applied.
//! - Each call is one atomic pass: snapshot, match, remove stale, append.

use crate::MARKER_ATTRIBUTE;
use crate::dom::{Document, Element};
use crate::types::{AttrList, HeadState, TagChanges, TagKind, content_value, is_content_key};

/// Elements added and removed by one pass, keyed by kind. Kinds that did not
/// change are absent from both maps.
#[derive(Debug, Default)]
pub struct AppliedChanges {
    pub added: TagChanges,
    pub removed: TagChanges,
}

/// Patch the document to match `state`, mutating only what changed.
pub fn apply_state(doc: &mut Document, state: &HeadState) -> AppliedChanges {
    update_attributes(&mut doc.html, &state.html_attributes);
    update_title(doc, &state.title, &state.title_attributes);

    let mut changes = AppliedChanges::default();
    for kind in TagKind::ALL {
        let update = update_tags(doc, kind, state.tags(kind));
        log::trace!(
            target: "masthead.reconcile",
            "{kind}: {} added, {} removed",
            update.added.len(),
            update.removed.len(),
        );
        if !update.added.is_empty() {
            changes.added.insert(kind, update.added);
        }
        if !update.removed.is_empty() {
            changes.removed.insert(kind, update.removed);
        }
    }
    changes
}

#[derive(Debug, Default)]
pub struct TagUpdate {
    pub added: Vec<Element>,
    pub removed: Vec<Element>,
}

/// Reconcile one kind's managed head elements against the target tag list.
pub fn update_tags(doc: &mut Document, kind: TagKind, tags: &[AttrList]) -> TagUpdate {
    let head = doc.head_mut();

    // Removal pool: positions of previously-applied elements of this kind,
    // in document order.
    let mut old: Vec<usize> = head
        .iter()
        .enumerate()
        .filter(|(_, el)| {
            el.name.eq_ignore_ascii_case(kind.name()) && el.has_attr(MARKER_ATTRIBUTE)
        })
        .map(|(i, _)| i)
        .collect();

    let mut added: Vec<Element> = Vec::new();
    for tag in tags {
        let candidate = materialize(kind, tag);
        if let Some(pos) = old.iter().position(|&i| head[i].same_shape(&candidate)) {
            // Keep the existing node untouched.
            old.remove(pos);
        } else {
            added.push(candidate);
        }
    }

    let mut removed: Vec<Element> = Vec::new();
    for &i in old.iter().rev() {
        removed.push(head.remove(i));
    }
    removed.reverse();

    for element in &added {
        head.push(element.clone());
    }

    TagUpdate { added, removed }
}

/// Materialize a tag mapping as a marker-tagged element. Every attribute is
/// applied as a string (absent values become the empty string); `innerHTML`
/// and `cssText` become raw content instead of attributes.
fn materialize(kind: TagKind, tag: &AttrList) -> Element {
    let mut element = Element::new(kind.name());
    for (key, value) in tag {
        if !is_content_key(key) {
            element.set_attr(key, value.as_deref().unwrap_or(""));
        }
    }
    element.content = content_value(tag).map(str::to_string);
    element.set_attr(MARKER_ATTRIBUTE, "true");
    element
}

/// Attribute-level reconciliation for `<html>` and `<title>`.
///
/// Keys previously applied by this crate are read from the marker
/// attribute's comma-joined value. Every key in `attributes` is set (absent
/// values apply as the empty string but are still tracked); tracked keys no
/// longer present are removed; the marker is rewritten to exactly the new
/// key list, or dropped when the list is empty.
pub fn update_attributes(element: &mut Element, attributes: &AttrList) {
    let tracked: Vec<String> = element
        .attr(MARKER_ATTRIBUTE)
        .map(|list| {
            list.split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut applied: Vec<String> = Vec::new();
    for (key, value) in attributes {
        element.set_attr(key, value.as_deref().unwrap_or(""));
        if !applied.contains(key) {
            applied.push(key.clone());
        }
    }

    for stale in &tracked {
        if !applied.contains(stale) {
            element.remove_attr(stale);
        }
    }

    if applied.is_empty() {
        element.remove_attr(MARKER_ATTRIBUTE);
    } else {
        element.set_attr(MARKER_ATTRIBUTE, &applied.join(","));
    }
}

/// A non-empty resolved title overwrites the document title; an empty one
/// leaves the existing text alone. Title attributes reconcile either way.
pub fn update_title(doc: &mut Document, title: &str, attributes: &AttrList) {
    if !title.is_empty() && doc.title_text() != title {
        doc.title.content = Some(title.to_string());
    }
    update_attributes(&mut doc.title, attributes);
}
