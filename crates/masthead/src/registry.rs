//! Ordered declaration registry and change dispatch.
//!
//! The registry tracks every mounted instance's declaration in mount order
//! (mount order is component-tree order: outermost first) and re-resolves
//! the full list on every register/update/unregister. It is an injectable
//! value, not a process-wide singleton; tests and hosts instantiate as many
//! isolated registries as they need. The live/server capability is fixed at
//! construction rather than toggled through a mutable global switch.

use crate::dom::Document;
use crate::reconcile;
use crate::render::HeadSnapshot;
use crate::resolve::{resolve, resolve_change_callback};
use crate::types::{HeadProps, HeadState};
use std::fmt;

/// Handle for one registered instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

#[derive(Debug)]
pub enum StateAccessError {
    /// The snapshot accessor was called while a live document is attached.
    LiveTargetActive,
}

impl fmt::Display for StateAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateAccessError::LiveTargetActive => f.write_str(
                "rewind() needs a server registry; this one drives a live document \
                 (read it with peek() or document() instead)",
            ),
        }
    }
}

impl std::error::Error for StateAccessError {}

#[derive(Debug)]
enum Target {
    Live(Document),
    Server,
}

#[derive(Debug)]
pub struct HeadRegistry {
    target: Target,
    instances: Vec<(InstanceId, HeadProps)>,
    next_id: u64,
    state: HeadState,
}

impl HeadRegistry {
    /// Registry driving a live document owned by the registry.
    pub fn live() -> Self {
        Self::with_target(Target::Live(Document::new()))
    }

    /// Registry that only accumulates state for snapshot rendering.
    pub fn server() -> Self {
        Self::with_target(Target::Server)
    }

    fn with_target(target: Target) -> Self {
        Self {
            target,
            instances: Vec::new(),
            next_id: 1,
            state: HeadState::default(),
        }
    }

    /// Mount an instance's declaration. Instances registered later are
    /// treated as nested deeper.
    pub fn register(&mut self, props: HeadProps) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.instances.push((id, props));
        log::trace!(
            target: "masthead.registry",
            "register {id:?}, {} mounted",
            self.instances.len(),
        );
        self.emit();
        id
    }

    /// Replace an instance's declaration. Structurally identical props are a
    /// no-op, mirroring the re-render gate of the host component layer.
    pub fn update(&mut self, id: InstanceId, props: HeadProps) {
        let Some(slot) = self.instances.iter_mut().find(|(i, _)| *i == id) else {
            log::trace!(target: "masthead.registry", "update for unmounted {id:?} ignored");
            return;
        };
        if slot.1 == props {
            return;
        }
        slot.1 = props;
        self.emit();
    }

    pub fn unregister(&mut self, id: InstanceId) {
        let before = self.instances.len();
        self.instances.retain(|(i, _)| *i != id);
        if self.instances.len() != before {
            log::trace!(
                target: "masthead.registry",
                "unregister {id:?}, {} mounted",
                self.instances.len(),
            );
            self.emit();
        }
    }

    /// The current resolved state, without resetting anything.
    pub fn peek(&self) -> &HeadState {
        &self.state
    }

    /// The live document, when one is attached.
    pub fn document(&self) -> Option<&Document> {
        match &self.target {
            Target::Live(doc) => Some(doc),
            Target::Server => None,
        }
    }

    /// Take the server snapshot and reset the registry for the next request.
    /// Fails fast on a live registry; the applied state lives in the
    /// document there.
    pub fn rewind(&mut self) -> Result<HeadSnapshot, StateAccessError> {
        if matches!(self.target, Target::Live(_)) {
            return Err(StateAccessError::LiveTargetActive);
        }
        let snapshot = HeadSnapshot::from_state(&self.state);
        self.instances.clear();
        self.state = HeadState::default();
        Ok(snapshot)
    }

    fn emit(&mut self) {
        let state = resolve(self.instances.iter().map(|(_, props)| props));
        let callback = resolve_change_callback(self.instances.iter().map(|(_, props)| props));
        match &mut self.target {
            Target::Live(doc) => {
                let changes = reconcile::apply_state(doc, &state);
                log::debug!(
                    target: "masthead.registry",
                    "applied state: {} kinds added, {} kinds removed",
                    changes.added.len(),
                    changes.removed.len(),
                );
                self.state = state;
                if let Some(callback) = callback {
                    callback(&self.state, &changes.added, &changes.removed);
                }
            }
            Target::Server => {
                self.state = state;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttrList;

    fn title_props(title: &str) -> HeadProps {
        HeadProps {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn registration_order_is_nesting_order() {
        let mut registry = HeadRegistry::server();
        registry.register(title_props("Outer"));
        registry.register(title_props("Inner"));
        assert_eq!(registry.peek().title, "Inner");
    }

    #[test]
    fn unregistering_restores_outer_state() {
        let mut registry = HeadRegistry::live();
        registry.register(title_props("Outer"));
        let inner = registry.register(title_props("Inner"));
        assert_eq!(registry.document().unwrap().title_text(), "Inner");

        registry.unregister(inner);
        assert_eq!(registry.peek().title, "Outer");
        assert_eq!(registry.document().unwrap().title_text(), "Outer");
    }

    #[test]
    fn update_with_equal_props_does_not_reemit() {
        let mut registry = HeadRegistry::server();
        let props = title_props("Stable");
        let id = registry.register(props.clone());
        let state_before = registry.peek().clone();
        registry.update(id, props);
        assert_eq!(registry.peek(), &state_before);
    }

    #[test]
    fn update_for_unknown_instance_is_ignored() {
        let mut registry = HeadRegistry::server();
        let id = registry.register(title_props("A"));
        registry.unregister(id);
        registry.update(id, title_props("B"));
        assert_eq!(registry.peek().title, "");
    }

    #[test]
    fn rewind_fails_fast_on_live_registry() {
        let mut registry = HeadRegistry::live();
        registry.register(title_props("A"));
        let err = registry.rewind().expect_err("live rewind must fail");
        assert!(err.to_string().contains("peek()"));
    }

    #[test]
    fn rewind_returns_snapshot_and_resets() {
        let mut registry = HeadRegistry::server();
        registry.register(title_props("Request Title"));
        let snapshot = registry.rewind().expect("server rewind");
        assert_eq!(snapshot.title.text(), "Request Title");

        // Reset: the next request starts from nothing.
        assert_eq!(registry.peek().title, "");
        let empty = registry.rewind().expect("second rewind");
        assert_eq!(empty, HeadSnapshot::empty());
    }

    #[test]
    fn rewind_before_any_registration_is_well_formed() {
        let mut registry = HeadRegistry::server();
        let snapshot = registry.rewind().expect("fresh rewind");
        assert_eq!(snapshot, HeadSnapshot::empty());
    }

    #[test]
    fn live_document_reflects_html_attributes() {
        let mut registry = HeadRegistry::live();
        let attrs: AttrList = vec![
            ("lang".to_string(), Some("en".to_string())),
            ("amp".to_string(), None),
        ];
        let id = registry.register(HeadProps {
            html_attributes: attrs,
            ..Default::default()
        });
        assert_eq!(registry.document().unwrap().html.attr("lang"), Some("en"));

        registry.unregister(id);
        let html = &registry.document().unwrap().html;
        assert!(html.attrs.is_empty());
    }
}
