use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::dom::{self, Element, EventKind, ListenerId, NodeRef, Selector};
use crate::widget::render::Role;

/// What a wired listener does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    InputChange,
    KeyPress,
    Clear,
    Search,
}

/// One listener per interactive element; both track buttons route to the
/// same search handler.
const WIRING: &[(Role, EventKind, Handler)] = &[
    (Role::SearchInput, EventKind::Input, Handler::InputChange),
    (Role::SearchInput, EventKind::KeyPress, Handler::KeyPress),
    (Role::ClearButton, EventKind::Click, Handler::Clear),
    (Role::SearchButton, EventKind::Click, Handler::Search),
    (Role::SearchButtonMobile, EventKind::Click, Handler::Search),
];

struct Binding {
    element: Weak<RefCell<Element>>,
    id: ListenerId,
    handler: Handler,
}

/// The listeners this widget added, and nothing else.
#[derive(Default)]
pub struct Listeners {
    bindings: Vec<Binding>,
}

impl Listeners {
    /// Wire every interactive element present under `container`. Returns the
    /// number of listeners added.
    pub fn attach(&mut self, container: &NodeRef) -> usize {
        let before = self.bindings.len();
        for (role, kind, handler) in WIRING {
            let Some(element) = dom::query_selector(container, &Selector::data_role(role.as_str()))
            else {
                continue;
            };
            let id = element.borrow_mut().add_listener(*kind);
            self.bindings.push(Binding {
                element: Rc::downgrade(&element),
                id,
                handler: *handler,
            });
        }
        let added = self.bindings.len() - before;
        tracing::debug!("Attached {} listeners", added);
        added
    }

    /// Remove every listener added by [`Listeners::attach`]. Elements already
    /// dropped by a re-render are skipped.
    pub fn detach(&mut self) {
        for binding in self.bindings.drain(..) {
            if let Some(element) = binding.element.upgrade() {
                element.borrow_mut().remove_listener(binding.id);
            }
        }
    }

    /// The handler for `kind` on `target`, if this widget wired one there.
    pub fn resolve(&self, target: &NodeRef, kind: EventKind) -> Option<Handler> {
        let element = target.borrow();
        let handler = element.listeners_for(kind).find_map(|id| {
            self.bindings
                .iter()
                .find(|b| b.id == id && std::ptr::eq(b.element.as_ptr(), Rc::as_ptr(target)))
                .map(|b| b.handler)
        });
        handler
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
