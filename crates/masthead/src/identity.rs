//! Primary-identity selection for head tags.
//!
//! Contract:
//! - A tag's attribute keys are scanned in declaration order; the last key
//!   matching a rule wins.
//! - A lowercased key matching a candidate becomes the identity key, except:
//!   a `rel` key already chosen with value `canonical` is never displaced,
//!   and a `rel` key whose value is `stylesheet` is never chosen (`href`
//!   identifies stylesheet links).
//! - `innerHTML`, `cssText` and `itemProp` match by exact case only.
//! - Identity values compare case-folded.
//! - A tag with no identity key, or whose identity value is missing or
//!   empty, has no identity at all and never reaches the merged output.

use crate::types::{AttrList, TagKind, attr_value};

pub const BASE_IDENTITY: &[&str] = &["href"];
pub const META_IDENTITY: &[&str] = &["name", "charset", "http-equiv", "property", "itemProp"];
pub const LINK_IDENTITY: &[&str] = &["rel", "href"];
pub const SCRIPT_IDENTITY: &[&str] = &["src", "innerHTML"];
pub const NOSCRIPT_IDENTITY: &[&str] = &["innerHTML"];
pub const STYLE_IDENTITY: &[&str] = &["cssText"];

const EXACT_CASE_KEYS: &[&str] = &["innerHTML", "cssText", "itemProp"];

pub fn identity_candidates(kind: TagKind) -> &'static [&'static str] {
    match kind {
        TagKind::Base => BASE_IDENTITY,
        TagKind::Meta => META_IDENTITY,
        TagKind::Link => LINK_IDENTITY,
        TagKind::Script => SCRIPT_IDENTITY,
        TagKind::Noscript => NOSCRIPT_IDENTITY,
        TagKind::Style => STYLE_IDENTITY,
    }
}

/// The identity key chosen for `tag`, plus the case-folded identity value
/// used for dedup comparisons. `None` means the tag has no valid identity.
pub fn select_identity(kind: TagKind, tag: &AttrList) -> Option<(&'static str, String)> {
    let candidates = identity_candidates(kind);
    let mut primary: Option<&'static str> = None;

    for (key, _) in tag {
        let lower = key.to_ascii_lowercase();
        if let Some(candidate) = candidates.iter().copied().find(|c| *c == lower) {
            let keep_canonical = primary == Some("rel")
                && attr_value(tag, "rel").is_some_and(|v| v.eq_ignore_ascii_case("canonical"));
            let rel_is_stylesheet = lower == "rel"
                && attr_value(tag, "rel").is_some_and(|v| v.eq_ignore_ascii_case("stylesheet"));
            if !keep_canonical && !rel_is_stylesheet {
                primary = Some(candidate);
            }
        }
        if EXACT_CASE_KEYS.contains(&key.as_str())
            && let Some(candidate) = candidates.iter().copied().find(|c| *c == key.as_str())
        {
            primary = Some(candidate);
        }
    }

    let key = primary?;
    let value = attr_value(tag, key)?;
    if value.is_empty() {
        return None;
    }
    Some((key, value.to_lowercase()))
}
