//! Frame-wide listener registry with RAII subscriptions.
//!
//! A [`ListenerRegistry`] plays the role of the document: every open dropdown registers its
//! pointer and key listeners there while open. Subscriptions unregister themselves on drop,
//! so closing or dropping a controller releases them deterministically.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::rc::Weak;

use ratatui::layout::Position;
use ratatui::layout::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerKind {
    PointerDown,
    KeyDown,
}

#[derive(Debug, Default)]
struct Slots {
    next_id: u64,
    live: Vec<(ListenerId, ListenerKind, Rect)>,
}

/// Shared list of live listeners. Clones share the same list.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    slots: Rc<RefCell<Slots>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("live", &self.slots.borrow().live.len())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: ListenerKind, root: Rect) -> Subscription {
        let mut slots = self.slots.borrow_mut();
        slots.next_id += 1;
        let id = ListenerId(slots.next_id);
        slots.live.push((id, kind, root));
        Subscription {
            id,
            kind,
            root,
            slots: Rc::downgrade(&self.slots),
        }
    }

    /// Number of live listeners of `kind`.
    pub fn count(&self, kind: ListenerKind) -> usize {
        self.slots
            .borrow()
            .live
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .count()
    }

    /// Pointer listeners whose root does not contain `pos`, i.e. the ones a pointer-down at
    /// `pos` would dismiss.
    pub fn pointer_outside(&self, pos: Position) -> Vec<ListenerId> {
        self.slots
            .borrow()
            .live
            .iter()
            .filter(|(_, k, root)| *k == ListenerKind::PointerDown && !contains(*root, pos))
            .map(|(id, _, _)| *id)
            .collect()
    }
}

/// A live listener. Dropping it unregisters it.
pub struct Subscription {
    id: ListenerId,
    kind: ListenerKind,
    root: Rect,
    slots: Weak<RefCell<Slots>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("root", &self.root)
            .finish()
    }
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    pub fn root(&self) -> Rect {
        self.root
    }

    /// Updates the component root this listener guards (after a re-layout).
    pub fn set_root(&mut self, root: Rect) {
        self.root = root;
        if let Some(slots) = self.slots.upgrade() {
            let mut slots = slots.borrow_mut();
            if let Some(slot) = slots.live.iter_mut().find(|(id, _, _)| *id == self.id) {
                slot.2 = root;
            }
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        contains(self.root, pos)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            slots.borrow_mut().live.retain(|(id, _, _)| *id != self.id);
        }
    }
}

pub(crate) fn contains(r: Rect, pos: Position) -> bool {
    pos.x >= r.x
        && pos.y >= r.y
        && u32::from(pos.x) < u32::from(r.x) + u32::from(r.width)
        && u32::from(pos.y) < u32::from(r.y) + u32::from(r.height)
}
