//! Typed observer primitives
//!
//! The mediator subscribes to every collaborator through these, keeps the
//! handles in one `SubscriptionSet`, and releases them together on teardown.
//! Emission snapshots the handler list first, so handlers may subscribe or
//! unsubscribe (including dropping their own handle) mid-dispatch.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Handler<T> = Rc<dyn Fn(&T)>;

struct Slots<T> {
    handlers: RefCell<Vec<(u64, Handler<T>)>>,
    next_id: Cell<u64>,
}

/// Single-threaded typed event stream. Cloning shares the subscriber list.
pub struct Event<T> {
    slots: Rc<Slots<T>>,
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Event<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<T> Event<T> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(Slots {
                handlers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.slots.handlers.borrow().len()
    }

    /// Dispatch to all current subscribers, in subscription order.
    pub fn emit(&self, value: &T) {
        // Snapshot so handlers can mutate the subscriber list reentrantly.
        let snapshot: Vec<Handler<T>> = self
            .slots
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in snapshot {
            handler(value);
        }
    }
}

impl<T: 'static> Event<T> {
    /// Register a handler. Dropping the returned handle detaches it.
    #[must_use]
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        let id = self.slots.next_id.get();
        self.slots.next_id.set(id + 1);
        self.slots
            .handlers
            .borrow_mut()
            .push((id, Rc::new(handler)));

        let weak: Weak<Slots<T>> = Rc::downgrade(&self.slots);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(slots) = weak.upgrade() {
                    slots.handlers.borrow_mut().retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }
}

/// Handle for one registered handler; detaches on drop.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Move this handle into a set, tying it to the set's lifetime.
    pub fn retain_in(self, set: &mut SubscriptionSet) {
        set.insert(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

/// Scoped bag of subscriptions, released together.
#[derive(Default)]
pub struct SubscriptionSet {
    subs: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sub: Subscription) {
        self.subs.push(sub);
    }

    /// Drop every held subscription; each detach runs independently of the
    /// others, so a teardown never leaves handlers behind.
    pub fn clear(&mut self) {
        self.subs.clear();
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}
