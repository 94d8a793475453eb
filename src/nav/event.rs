//! Navigation events and the in-order event queue.
//!
//! [`EventQueue`] is a FIFO of pending events. [`EventSender`] is a cloneable
//! producer handle that host bridges (history, back button, links) hold; the
//! owner drains the queue and applies events strictly in arrival order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::entry::NavigationState;

// ---------------------------------------------------------------------------
// NavigationEvent
// ---------------------------------------------------------------------------

/// A browser-style history event.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// Append a new active entry.
    Push { path: String, state: NavigationState },
    /// Swap the top entry for a new one; stack length is unchanged.
    Replace { path: String, state: NavigationState },
    /// Remove the top entry unless that would leave no routable entry.
    Pop,
}

impl NavigationEvent {
    /// Push `path` with no state.
    pub fn push(path: impl Into<String>) -> Self {
        Self::Push {
            path: path.into(),
            state: NavigationState::Null,
        }
    }

    /// Replace with `path` and no state.
    pub fn replace(path: impl Into<String>) -> Self {
        Self::Replace {
            path: path.into(),
            state: NavigationState::Null,
        }
    }

    /// Attach state to a push or replace. No effect on `Pop`.
    pub fn with_state(mut self, new_state: NavigationState) -> Self {
        match &mut self {
            Self::Push { state, .. } | Self::Replace { state, .. } => *state = new_state,
            Self::Pop => {}
        }
        self
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Push { .. } => "push",
            Self::Replace { .. } => "replace",
            Self::Pop => "pop",
        }
    }
}

// ---------------------------------------------------------------------------
// EventQueue
// ---------------------------------------------------------------------------

/// FIFO of pending events. Nothing is dropped, reordered, or coalesced.
#[derive(Debug)]
pub struct EventQueue<E> {
    queue: VecDeque<E>,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Enqueue an event at the back.
    pub fn push(&mut self, event: E) {
        self.queue.push_back(event);
    }

    /// Take the oldest pending event.
    pub fn pop_front(&mut self) -> Option<E> {
        self.queue.pop_front()
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<E> {
        self.queue.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// EventSender
// ---------------------------------------------------------------------------

/// Cloneable producer handle onto a shared [`EventQueue`].
#[derive(Debug)]
pub struct EventSender<E> {
    queue: Rc<RefCell<EventQueue<E>>>,
}

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl<E> EventSender<E> {
    pub(crate) fn new(queue: Rc<RefCell<EventQueue<E>>>) -> Self {
        Self { queue }
    }

    /// Enqueue an event for the owner to process.
    pub fn send(&self, event: E) {
        self.queue.borrow_mut().push(event);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
