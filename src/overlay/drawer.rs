//! Bottom drawer backed by a path-less view-stack entry.
//!
//! An open [`Drawer`] occupies its own entry on top of the stack, so a back
//! signal pops the drawer before any page. Open/visible state is derived
//! from the stack rather than stored, which keeps it correct when the entry
//! is removed by a pop.

use tracing::debug;

use crate::nav::{EntryId, NavigationError, NavigationState, Navigator};

/// A drawer whose content is pushed as payload `P`.
#[derive(Debug, Clone)]
pub struct Drawer<P> {
    content: P,
    entry: Option<EntryId>,
}

impl<P: Clone> Drawer<P> {
    pub fn new(content: P) -> Self {
        Self {
            content,
            entry: None,
        }
    }

    pub fn content(&self) -> &P {
        &self.content
    }

    /// Push the drawer entry. Opening an already open drawer does nothing.
    pub fn open(&mut self, nav: &mut Navigator<P>) -> Result<EntryId, NavigationError> {
        if let Some(id) = self.live_entry(nav) {
            return Ok(id);
        }
        let id = nav.push_detached(self.content.clone(), NavigationState::Null)?;
        debug!(?id, "drawer opened");
        self.entry = Some(id);
        Ok(id)
    }

    /// Remove the drawer entry wherever it is in the stack.
    pub fn close(&mut self, nav: &mut Navigator<P>) -> bool {
        match self.entry.take() {
            Some(id) => nav.remove_detached(id),
            None => false,
        }
    }

    /// Whether the drawer's entry is still on the stack.
    pub fn is_open(&self, nav: &Navigator<P>) -> bool {
        self.live_entry(nav).is_some()
    }

    /// Whether the drawer is open and nothing has been pushed over it.
    pub fn is_visible(&self, nav: &Navigator<P>) -> bool {
        match (self.live_entry(nav), nav.top()) {
            (Some(id), Some(top)) => top.id == id,
            _ => false,
        }
    }

    fn live_entry(&self, nav: &Navigator<P>) -> Option<EntryId> {
        self.entry.filter(|id| nav.entry(*id).is_some())
    }
}
