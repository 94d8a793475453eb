//! Hardware back-button interception.
//!
//! [`BackHandlers`] maps an owner id (typically an open overlay's instance
//! id) to a one-shot callback. A back signal invokes only the most recently
//! registered handler, which is consumed; with no handler registered the
//! signal falls through to a navigation pop. [`BackButton`] is an in-process
//! [`BackSignalSource`] hosts and tests can press.

use std::fmt;

use tracing::debug;

use crate::state::{Listeners, SubscriptionId};

// ---------------------------------------------------------------------------
// BackHandlers
// ---------------------------------------------------------------------------

type Handler = Box<dyn FnOnce()>;

/// Stack of back handlers, most recent last.
pub struct BackHandlers {
    handlers: Vec<(String, Handler)>,
}

impl BackHandlers {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a handler under `id`.
    ///
    /// Re-registering an existing id replaces its handler and makes it the
    /// most recent.
    pub fn register(&mut self, id: impl Into<String>, handler: impl FnOnce() + 'static) {
        let id = id.into();
        self.handlers.retain(|(existing, _)| *existing != id);
        debug!(id = %id, "back handler registered");
        self.handlers.push((id, Box::new(handler)));
    }

    /// Remove the handler for `id`. Returns `false` if none was registered.
    pub fn deregister(&mut self, id: &str) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| existing != id);
        before != self.handlers.len()
    }

    /// Consume and run the most recent handler.
    ///
    /// Returns the id of the handler that ran, or `None` if the signal should
    /// fall through to the default pop.
    pub fn dispatch(&mut self) -> Option<String> {
        let (id, handler) = self.handlers.pop()?;
        debug!(id = %id, "back signal intercepted");
        handler();
        Some(id)
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.handlers.iter().any(|(existing, _)| existing == id)
    }

    /// Id of the handler the next back signal would invoke.
    pub fn top(&self) -> Option<&str> {
        self.handlers.last().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for BackHandlers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BackHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.handlers.iter().map(|(id, _)| id.as_str()).collect();
        f.debug_struct("BackHandlers").field("ids", &ids).finish()
    }
}

// ---------------------------------------------------------------------------
// Back signal source
// ---------------------------------------------------------------------------

/// A source of hardware/OS back signals.
pub trait BackSignalSource {
    /// Start delivering back signals to `callback`.
    fn subscribe(&mut self, callback: Box<dyn FnMut()>) -> SubscriptionId;

    /// Stop delivering to a previous subscription.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// In-process back button.
#[derive(Debug, Default)]
pub struct BackButton {
    listeners: Listeners<()>,
}

impl BackButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one back signal to every subscriber.
    pub fn press(&mut self) {
        self.listeners.notify(&());
    }
}

impl BackSignalSource for BackButton {
    fn subscribe(&mut self, mut callback: Box<dyn FnMut()>) -> SubscriptionId {
        self.listeners.subscribe(move |_| callback())
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
