//! Declarative document-head management.
//!
//! Arbitrarily nested components each declare a desired state for the
//! `<html>` attributes and `<head>` contents (title, base, meta, link,
//! script, noscript, style). An ordered declaration list resolves into one
//! deduplicated [`HeadState`], which is either applied to a live
//! [`dom::Document`] as a minimal patch or captured as a serializable
//! [`HeadSnapshot`] for server markup generation.

pub mod dom;
pub mod identity;
pub mod reconcile;
pub mod registry;
pub mod render;
pub mod resolve;
mod types;

/// Attribute marking elements and attributes managed by this crate. The same
/// name is used on live documents and in serialized markup.
pub const MARKER_ATTRIBUTE: &str = "data-masthead";

pub use crate::dom::{Document, Element};
pub use crate::reconcile::{AppliedChanges, apply_state};
pub use crate::registry::{HeadRegistry, InstanceId, StateAccessError};
pub use crate::render::{HeadSnapshot, encode_special_characters};
pub use crate::resolve::{resolve, resolve_change_callback};
pub use crate::types::{AttrList, ChangeCallback, HeadProps, HeadState, TagChanges, TagKind};
