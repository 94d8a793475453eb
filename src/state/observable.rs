//! Shared observable cell.
//!
//! [`Observable`] is a cloneable handle to one value plus its subscribers,
//! modeled on a signal read/write pair but owned explicitly instead of living
//! in a thread-local runtime. Clones share the same value. Writes notify
//! subscribers after the value is stored, so a subscriber may read or even
//! write the observable again.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::listeners::{self, Listeners, SubscriptionId};

struct Inner<T> {
    value: T,
    listeners: Listeners<T>,
}

/// Single-threaded shared value with change notification.
pub struct Observable<T: 'static> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T: 'static> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("subscribers", &inner.listeners.len())
            .finish()
    }
}

impl<T: Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> Observable<T> {
    /// Create an observable holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value: initial,
                listeners: Listeners::new(),
            })),
        }
    }

    /// Clone out the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.borrow().value.clone()
    }

    /// Read by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Overwrite the value and notify subscribers.
    pub fn set(&self, value: T)
    where
        T: Clone,
    {
        self.inner.borrow_mut().value = value;
        self.notify();
    }

    /// Overwrite only if the value differs. Returns whether it changed.
    pub fn set_if_changed(&self, value: T) -> bool
    where
        T: Clone + PartialEq,
    {
        let changed = self.with(|old| *old != value);
        if changed {
            self.set(value);
        }
        changed
    }

    /// Mutate in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T))
    where
        T: Clone,
    {
        f(&mut self.inner.borrow_mut().value);
        self.notify();
    }

    /// Subscribe to future changes.
    pub fn subscribe(&self, f: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.inner.borrow_mut().listeners.subscribe(f)
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.borrow_mut().listeners.unsubscribe(id)
    }

    /// Number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn notify(&self)
    where
        T: Clone,
    {
        // Snapshot value and callbacks so no borrow is held while they run.
        let (value, subs) = {
            let inner = self.inner.borrow();
            (inner.value.clone(), inner.listeners.snapshot())
        };
        for (id, cb) in subs {
            let live = self.inner.borrow().listeners.contains(id);
            if live {
                listeners::call(&cb, &value);
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
