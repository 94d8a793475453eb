//! Full-screen overlay that closes on back.
//!
//! Opening an [`Overlay`] registers a back handler under its instance id, so
//! the next back signal closes the overlay instead of navigating. Closing it
//! from the UI drops that registration again.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::app::AppEvent;
use crate::nav::{BackHandlers, EventSender};
use crate::state::Observable;

static NEXT_OVERLAY: AtomicU64 = AtomicU64::new(1);

/// A modal overlay with observable open state.
#[derive(Debug, Clone)]
pub struct Overlay {
    id: String,
    open: Observable<bool>,
}

impl Overlay {
    /// Create a closed overlay with a fresh `overlay-<n>` id.
    pub fn new() -> Self {
        let n = NEXT_OVERLAY.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("overlay-{n}"),
            open: Observable::new(false),
        }
    }

    /// Instance id; also the back-handler key.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Open state, for subscribing.
    pub fn state(&self) -> Observable<bool> {
        self.open.clone()
    }

    /// Open and claim the next back signal.
    pub fn open(&self, handlers: &mut BackHandlers) {
        let state = self.open.clone();
        handlers.register(self.id.clone(), move || state.set(false));
        self.open.set_if_changed(true);
    }

    /// Close from the UI, releasing the back handler.
    pub fn close(&self, handlers: &mut BackHandlers) {
        handlers.deregister(&self.id);
        self.open.set_if_changed(false);
    }

    /// Close the way a back button would: by queuing a back signal, which the
    /// session routes to this overlay's handler.
    pub fn request_close(&self, sender: &EventSender<AppEvent>) {
        sender.send(AppEvent::Back);
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}
