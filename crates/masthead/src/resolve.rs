//! Folding an ordered declaration list into one canonical [`HeadState`].
//!
//! Contract:
//! - Input order is outermost to innermost; order is the only priority
//!   signal.
//! - Resolution is pure: same list in, bit-identical state out, no document
//!   access, no call history.
//! - Malformed tags degrade by omission; resolution never fails.

use crate::identity::select_identity;
use crate::types::{AttrList, ChangeCallback, HeadProps, HeadState, TagKind, attr_value};
use std::collections::{HashMap, HashSet};

/// Resolve a declaration list into the canonical head state.
pub fn resolve<'a>(props_list: impl IntoIterator<Item = &'a HeadProps>) -> HeadState {
    let list: Vec<&HeadProps> = props_list.into_iter().collect();
    HeadState {
        html_attributes: merge_attributes(list.iter().map(|p| &p.html_attributes)),
        title: resolve_title(&list),
        title_attributes: merge_attributes(list.iter().map(|p| &p.title_attributes)),
        base_tag: resolve_base(&list),
        meta_tags: merge_tag_lists(TagKind::Meta, &list),
        link_tags: merge_tag_lists(TagKind::Link, &list),
        script_tags: merge_tag_lists(TagKind::Script, &list),
        noscript_tags: merge_tag_lists(TagKind::Noscript, &list),
        style_tags: merge_tag_lists(TagKind::Style, &list),
    }
}

/// The innermost declaration's change callback, if any declares one.
pub fn resolve_change_callback<'a>(
    props_list: impl IntoIterator<Item = &'a HeadProps>,
) -> Option<ChangeCallback> {
    let list: Vec<&HeadProps> = props_list.into_iter().collect();
    list.iter()
        .rev()
        .find_map(|p| p.on_change_client_state.clone())
}

fn innermost_non_empty<'a, F>(list: &[&'a HeadProps], field: F) -> Option<&'a str>
where
    F: Fn(&'a HeadProps) -> Option<&'a str>,
{
    list.iter()
        .rev()
        .find_map(|&p| field(p).filter(|s| !s.is_empty()))
}

/// Innermost non-empty title, falling back to the innermost non-empty
/// default title. A template only applies to an explicitly declared title;
/// the title is substituted for every literal `%s` as an opaque value.
fn resolve_title(list: &[&HeadProps]) -> String {
    let title = innermost_non_empty(list, |p| p.title.as_deref());
    let template = innermost_non_empty(list, |p| p.title_template.as_deref());

    if let (Some(title), Some(template)) = (title, template) {
        return template.replace("%s", title);
    }

    let default = innermost_non_empty(list, |p| p.default_title.as_deref());
    title.or(default).unwrap_or("").to_string()
}

/// Shallow merge, outer to inner; a later occurrence of a key replaces the
/// earlier value in place, keeping the first occurrence's position.
fn merge_attributes<'a>(lists: impl Iterator<Item = &'a AttrList>) -> AttrList {
    let mut merged: AttrList = Vec::new();
    for list in lists {
        for (key, value) in list {
            if let Some(slot) = merged.iter_mut().find(|(k, _)| k == key) {
                slot.1 = value.clone();
            } else {
                merged.push((key.clone(), value.clone()));
            }
        }
    }
    merged
}

/// Innermost base tag carrying a non-empty `href`; at most one survives.
fn resolve_base(list: &[&HeadProps]) -> Vec<AttrList> {
    for props in list.iter().rev() {
        if let Some(tag) = &props.base
            && attr_value(tag, "href").is_some_and(|href| !href.is_empty())
        {
            return vec![tag.clone()];
        }
    }
    Vec::new()
}

/// Merge one kind's tag lists across all declarations, innermost winning on
/// identity collisions.
///
/// Declarations are processed innermost first against a globally-approved
/// map of identity key to case-folded values. Tags inside one declaration
/// are only checked against that global map, so same-declaration duplicates
/// all survive. Each declaration's accepted batch is emitted reversed and
/// the whole result reversed once at the end: outermost batches come first
/// with their internal order intact.
pub(crate) fn merge_tag_lists(kind: TagKind, list: &[&HeadProps]) -> Vec<AttrList> {
    let mut approved_seen: HashMap<&'static str, HashSet<String>> = HashMap::new();
    let mut approved: Vec<AttrList> = Vec::new();

    for props in list.iter().rev() {
        let mut instance_seen: HashMap<&'static str, HashSet<String>> = HashMap::new();
        let mut batch: Vec<&AttrList> = Vec::new();

        for tag in props.tag_list(kind) {
            let Some((key, value)) = select_identity(kind, tag) else {
                continue;
            };
            if approved_seen.get(key).is_some_and(|seen| seen.contains(&value)) {
                continue;
            }
            instance_seen.entry(key).or_default().insert(value);
            batch.push(tag);
        }

        approved.extend(batch.into_iter().rev().cloned());

        for (key, values) in instance_seen {
            approved_seen.entry(key).or_default().extend(values);
        }
    }

    approved.reverse();
    approved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn tag(pairs: &[(&str, &str)]) -> AttrList {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    fn meta_props(tags: &[&[(&str, &str)]]) -> HeadProps {
        HeadProps {
            meta: tags.iter().map(|t| tag(t)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn resolving_twice_is_bit_identical() {
        let list = vec![
            HeadProps {
                title: Some("Outer".to_string()),
                html_attributes: tag(&[("lang", "en")]),
                meta: vec![tag(&[("name", "description"), ("content", "A")])],
                link: vec![tag(&[("rel", "canonical"), ("href", "http://example.test")])],
                ..Default::default()
            },
            HeadProps {
                title_template: Some("%s | Site".to_string()),
                meta: vec![tag(&[("charset", "utf-8")])],
                ..Default::default()
            },
        ];
        assert_eq!(resolve(&list), resolve(&list));
    }

    #[test]
    fn title_falls_back_to_nearest_ancestor() {
        let list = vec![
            HeadProps {
                title: Some("Main".to_string()),
                ..Default::default()
            },
            HeadProps::default(),
        ];
        assert_eq!(resolve(&list).title, "Main");
    }

    #[test]
    fn title_template_replaces_every_occurrence() {
        let list = vec![HeadProps {
            title: Some("Test".to_string()),
            title_template: Some("This is a %s of %s".to_string()),
            ..Default::default()
        }];
        assert_eq!(resolve(&list).title, "This is a Test of Test");
    }

    #[test]
    fn title_substitution_is_opaque() {
        let list = vec![HeadProps {
            title: Some("50% off %s".to_string()),
            title_template: Some("Deals: %s".to_string()),
            ..Default::default()
        }];
        assert_eq!(resolve(&list).title, "Deals: 50% off %s");
    }

    #[test]
    fn template_does_not_apply_to_default_title() {
        let list = vec![HeadProps {
            default_title: Some("Fallback".to_string()),
            title_template: Some("%s | Site".to_string()),
            ..Default::default()
        }];
        assert_eq!(resolve(&list).title, "Fallback");
    }

    #[test]
    fn empty_titles_are_skipped_when_scanning_inward() {
        let list = vec![
            HeadProps {
                title: Some("Kept".to_string()),
                ..Default::default()
            },
            HeadProps {
                title: Some(String::new()),
                ..Default::default()
            },
        ];
        assert_eq!(resolve(&list).title, "Kept");
    }

    #[test]
    fn missing_title_resolves_to_empty_string() {
        let empty: Vec<HeadProps> = Vec::new();
        assert_eq!(resolve(&empty).title, "");
        assert_eq!(resolve(&[HeadProps::default()]).title, "");
    }

    #[test]
    fn html_attributes_merge_inner_wins() {
        let list = vec![
            HeadProps {
                html_attributes: tag(&[("lang", "en"), ("dir", "ltr")]),
                ..Default::default()
            },
            HeadProps {
                html_attributes: tag(&[("lang", "ja")]),
                ..Default::default()
            },
        ];
        assert_eq!(
            resolve(&list).html_attributes,
            tag(&[("lang", "ja"), ("dir", "ltr")])
        );
    }

    #[test]
    fn base_takes_innermost_with_usable_href() {
        let list = vec![
            HeadProps {
                base: Some(tag(&[("href", "http://outer.test/")])),
                ..Default::default()
            },
            HeadProps {
                base: Some(tag(&[("target", "_blank")])),
                ..Default::default()
            },
        ];
        let state = resolve(&list);
        assert_eq!(state.base_tag, vec![tag(&[("href", "http://outer.test/")])]);
    }

    #[test]
    fn base_without_href_resolves_empty() {
        let list = vec![HeadProps {
            base: Some(tag(&[("target", "_blank")])),
            ..Default::default()
        }];
        assert!(resolve(&list).base_tag.is_empty());
    }

    #[test]
    fn unique_identities_all_survive() {
        let list = vec![
            meta_props(&[
                &[("name", "description"), ("content", "A")],
                &[("charset", "utf-8")],
            ]),
            meta_props(&[&[("property", "og:title"), ("content", "B")]]),
        ];
        let state = resolve(&list);
        assert_eq!(state.meta_tags.len(), 3);
    }

    #[test]
    fn inner_declaration_overrides_outer_duplicate() {
        let list = vec![
            meta_props(&[&[("name", "description"), ("content", "A")]]),
            meta_props(&[&[("name", "description"), ("content", "B")]]),
        ];
        let state = resolve(&list);
        assert_eq!(
            state.meta_tags,
            vec![tag(&[("name", "description"), ("content", "B")])]
        );
    }

    #[test]
    fn one_inner_tag_replaces_multiple_outer_duplicates() {
        let list = vec![
            meta_props(&[
                &[("name", "description"), ("content", "A")],
                &[("name", "description"), ("content", "B")],
            ]),
            meta_props(&[&[("name", "description"), ("content", "C")]]),
        ];
        let state = resolve(&list);
        assert_eq!(
            state.meta_tags,
            vec![tag(&[("name", "description"), ("content", "C")])]
        );
    }

    #[test]
    fn same_declaration_duplicates_both_survive_in_order() {
        let list = vec![meta_props(&[
            &[("name", "description"), ("content", "A")],
            &[("name", "description"), ("content", "B")],
        ])];
        let state = resolve(&list);
        assert_eq!(
            state.meta_tags,
            vec![
                tag(&[("name", "description"), ("content", "A")]),
                tag(&[("name", "description"), ("content", "B")]),
            ]
        );
    }

    #[test]
    fn output_is_outermost_first_with_batch_order_intact() {
        let list = vec![
            meta_props(&[
                &[("name", "a"), ("content", "1")],
                &[("name", "b"), ("content", "2")],
            ]),
            meta_props(&[&[("name", "c"), ("content", "3")]]),
        ];
        let state = resolve(&list);
        let names: Vec<&str> = state
            .meta_tags
            .iter()
            .map(|t| attr_value(t, "name").unwrap())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn identity_dedup_folds_value_case() {
        let list = vec![
            meta_props(&[&[("name", "Description"), ("content", "outer")]]),
            meta_props(&[&[("name", "description"), ("content", "inner")]]),
        ];
        let state = resolve(&list);
        assert_eq!(state.meta_tags.len(), 1);
        assert_eq!(attr_value(&state.meta_tags[0], "content"), Some("inner"));
    }

    #[test]
    fn stylesheet_links_with_distinct_hrefs_coexist() {
        let list = vec![
            HeadProps {
                link: vec![tag(&[("rel", "stylesheet"), ("href", "a.css")])],
                ..Default::default()
            },
            HeadProps {
                link: vec![tag(&[("rel", "stylesheet"), ("href", "b.css")])],
                ..Default::default()
            },
        ];
        assert_eq!(resolve(&list).link_tags.len(), 2);
    }

    #[test]
    fn canonical_links_collapse_to_innermost() {
        let list = vec![
            HeadProps {
                link: vec![tag(&[("rel", "canonical"), ("href", "http://a.test")])],
                ..Default::default()
            },
            HeadProps {
                link: vec![tag(&[("rel", "canonical"), ("href", "http://b.test")])],
                ..Default::default()
            },
        ];
        let state = resolve(&list);
        assert_eq!(
            state.link_tags,
            vec![tag(&[("rel", "canonical"), ("href", "http://b.test")])]
        );
    }

    #[test]
    fn identity_less_tags_never_appear() {
        let list = vec![meta_props(&[
            &[("content", "orphan")],
            &[("name", "ok"), ("content", "kept")],
        ])];
        let state = resolve(&list);
        assert_eq!(state.meta_tags, vec![tag(&[("name", "ok"), ("content", "kept")])]);
    }

    #[test]
    fn change_callback_takes_innermost() {
        let outer: ChangeCallback = Rc::new(|_, _, _| {});
        let inner: ChangeCallback = Rc::new(|_, _, _| {});
        let list = vec![
            HeadProps {
                on_change_client_state: Some(outer),
                ..Default::default()
            },
            HeadProps {
                on_change_client_state: Some(inner.clone()),
                ..Default::default()
            },
        ];
        let resolved = resolve_change_callback(&list).expect("callback expected");
        assert!(Rc::ptr_eq(&resolved, &inner));
    }
}
