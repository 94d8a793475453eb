//! Subscriber lists keyed by [`SubscriptionId`].
//!
//! [`Listeners`] is the owned replacement for an ambient reactive runtime:
//! each state owner keeps its own list and calls [`Listeners::notify`] after
//! it mutates. Callbacks are reference counted so a notification pass can run
//! from a snapshot while the list itself is edited by the callbacks.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned by `subscribe`, used to unsubscribe.
    pub struct SubscriptionId;
}

pub(crate) type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

/// Ordered set of callbacks interested in values of type `T`.
pub struct Listeners<T> {
    slots: SlotMap<SubscriptionId, Callback<T>>,
    /// Insertion order, so notification order is deterministic.
    order: Vec<SubscriptionId>,
}

impl<T> Listeners<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Register a callback. It is not invoked until the next `notify`.
    pub fn subscribe(&mut self, f: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = self.slots.insert(Rc::new(RefCell::new(f)));
        self.order.push(id);
        id
    }

    /// Remove a callback. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if self.slots.remove(id).is_some() {
            self.order.retain(|&o| o != id);
            true
        } else {
            false
        }
    }

    /// Whether `id` is still subscribed.
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.slots.contains_key(id)
    }

    /// Call every subscriber with `value`, in subscription order.
    pub fn notify(&mut self, value: &T) {
        for (_, cb) in self.snapshot() {
            call(&cb, value);
        }
    }

    /// Current subscribers in order, detached from the list.
    pub(crate) fn snapshot(&self) -> Vec<(SubscriptionId, Callback<T>)> {
        self.order
            .iter()
            .filter_map(|&id| self.slots.get(id).map(|cb| (id, Rc::clone(cb))))
            .collect()
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every subscriber.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }
}

/// Invoke one callback. A callback that is already running (it triggered a
/// nested notification) is skipped rather than re-entered.
pub(crate) fn call<T>(cb: &Callback<T>, value: &T) {
    if let Ok(mut f) = cb.try_borrow_mut() {
        f(value);
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.order.len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn new_list_is_empty() {
        let l: Listeners<u32> = Listeners::new();
        assert!(l.is_empty());
        assert_eq!(l.len(), 0);
    }

    #[test]
    fn notify_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut l = Listeners::new();
        let a = Rc::clone(&log);
        l.subscribe(move |v: &u32| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&log);
        l.subscribe(move |v: &u32| b.borrow_mut().push(("b", *v)));

        l.notify(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(Cell::new(0));
        let mut l = Listeners::new();
        let c = Rc::clone(&count);
        let id = l.subscribe(move |_: &()| c.set(c.get() + 1));

        l.notify(&());
        assert!(l.unsubscribe(id));
        assert!(!l.contains(id));
        l.notify(&());

        assert_eq!(count.get(), 1);
        assert!(!l.unsubscribe(id));
    }

    #[test]
    fn clear_removes_all() {
        let mut l = Listeners::new();
        l.subscribe(|_: &u8| {});
        l.subscribe(|_: &u8| {});
        assert_eq!(l.len(), 2);
        l.clear();
        assert!(l.is_empty());
    }
}
