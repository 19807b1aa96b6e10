use ratatui::layout::Rect;

use crate::input::MouseEvent;
use crate::listener::ListenerKind;
use crate::listener::ListenerRegistry;
use crate::listener::Subscription;

/// Closes the panel on pointer-down outside the component root.
///
/// Exists only while the panel is open: the controller creates it on open and drops it on
/// close, which unregisters its listener.
#[derive(Debug)]
pub struct DismissalWatcher {
    subscription: Subscription,
}

impl DismissalWatcher {
    pub fn attach(registry: &ListenerRegistry, root: Rect) -> Self {
        Self {
            subscription: registry.subscribe(ListenerKind::PointerDown, root),
        }
    }

    pub fn root(&self) -> Rect {
        self.subscription.root()
    }

    pub fn set_root(&mut self, root: Rect) {
        if self.subscription.root() != root {
            self.subscription.set_root(root);
        }
    }

    /// `true` if `event` is a pointer-down that lands outside the root.
    pub fn should_dismiss(&self, event: &MouseEvent) -> bool {
        event.is_pointer_down() && !self.subscription.contains(event.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseEventKind;

    #[test]
    fn dismisses_only_outside_pointer_downs() {
        let reg = ListenerRegistry::new();
        let w = DismissalWatcher::attach(&reg, Rect::new(2, 2, 10, 5));
        assert!(w.should_dismiss(&MouseEvent::down(0, 0)));
        assert!(!w.should_dismiss(&MouseEvent::down(5, 3)));
        let moved = MouseEvent {
            x: 0,
            y: 0,
            kind: MouseEventKind::Moved,
        };
        assert!(!w.should_dismiss(&moved));
    }

    #[test]
    fn dropping_the_watcher_detaches_it() {
        let reg = ListenerRegistry::new();
        let w = DismissalWatcher::attach(&reg, Rect::new(0, 0, 1, 1));
        assert_eq!(reg.count(ListenerKind::PointerDown), 1);
        drop(w);
        assert_eq!(reg.count(ListenerKind::PointerDown), 0);
    }
}
