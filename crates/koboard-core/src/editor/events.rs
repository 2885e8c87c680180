//! Change notification for the surrounding UI.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener = Rc<RefCell<dyn FnMut()>>;

#[derive(Default)]
struct Slots {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Registered change listeners.
#[derive(Default)]
pub(crate) struct Listeners {
    slots: Rc<RefCell<Slots>>,
}

impl Listeners {
    pub(crate) fn subscribe(&self, callback: impl FnMut() + 'static) -> Subscription {
        let mut slots = self.slots.borrow_mut();
        let id = slots.next_id;
        slots.next_id += 1;
        slots.listeners.push((id, Rc::new(RefCell::new(callback))));
        Subscription {
            id,
            slots: Rc::downgrade(&self.slots),
        }
    }

    pub(crate) fn notify(&self) {
        // Snapshot first so a callback may drop its own subscription.
        let listeners: Vec<Listener> = self
            .slots
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (&mut *callback)();
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.borrow().listeners.len()
    }
}

/// Keeps a listener attached. Dropping it detaches the listener.
#[must_use = "dropping a Subscription detaches the listener"]
pub struct Subscription {
    id: u64,
    slots: Weak<RefCell<Slots>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            if let Ok(mut slots) = slots.try_borrow_mut() {
                slots.listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_notify_and_detach() {
        let listeners = Listeners::default();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let subscription = listeners.subscribe(move || seen.set(seen.get() + 1));
        listeners.notify();
        listeners.notify();
        assert_eq!(count.get(), 2);

        drop(subscription);
        listeners.notify();
        assert_eq!(count.get(), 2);
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn test_subscription_outlives_registry() {
        let listeners = Listeners::default();
        let subscription = listeners.subscribe(|| {});
        drop(listeners);
        drop(subscription);
    }
}
