//! The navigation state machine.
//!
//! [`Navigator`] owns the ordered view stack for one UI session. It is driven
//! by [`NavigationEvent`]s and guarantees that, once initialized, the stack
//! always holds at least one entry with a path. The top entry is the only
//! `Active` one; the last entry with a path is the displayed page.

use tracing::debug;

use super::entry::{EntryId, EntryStatus, NavigationState, View, ViewStackEntry};
use super::event::NavigationEvent;
use crate::route::Resolver;
use crate::state::{Listeners, SubscriptionId};

/// Precondition violations. These are integration bugs, not user errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("navigator used before initialize()")]
    NotInitialized,
    #[error("navigator is already initialized")]
    AlreadyInitialized,
    #[error("at least one main route is required")]
    EmptyMainRoutes,
}

// ---------------------------------------------------------------------------
// NavigationChange
// ---------------------------------------------------------------------------

/// What triggered a stack change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    Initialize,
    Push,
    Replace,
    Pop,
    /// A path-less entry was pushed or removed.
    Detached,
}

/// Published to subscribers after every stack mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationChange {
    pub cause: ChangeCause,
    /// Path of the displayed page after the change.
    pub current_path: Option<String>,
    /// Total number of entries after the change.
    pub len: usize,
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// Ordered view stack plus the resolver that fills it.
pub struct Navigator<P> {
    entries: Vec<ViewStackEntry<P>>,
    resolver: Box<dyn Resolver<P>>,
    initialized: bool,
    next_id: u64,
    listeners: Listeners<NavigationChange>,
}

impl<P> Navigator<P> {
    /// Create an uninitialized navigator resolving paths with `resolver`.
    pub fn new(resolver: impl Resolver<P> + 'static) -> Self {
        Self {
            entries: Vec::new(),
            resolver: Box::new(resolver),
            initialized: false,
            next_id: 0,
            listeners: Listeners::new(),
        }
    }

    /// Seed the stack for a new session.
    ///
    /// If `initial_path` is not one of `main_routes`, a background entry for
    /// the first main route is placed beneath it, so backing out of a deep
    /// link lands on a main route instead of leaving the app. Unknown paths
    /// render as [`View::NotFound`].
    pub fn initialize<S: AsRef<str>>(
        &mut self,
        initial_path: &str,
        main_routes: &[S],
    ) -> Result<(), NavigationError> {
        if self.initialized {
            return Err(NavigationError::AlreadyInitialized);
        }
        let main_routes: Vec<&str> = main_routes.iter().map(|r| r.as_ref()).collect();
        let first_main = *main_routes
            .first()
            .ok_or(NavigationError::EmptyMainRoutes)?;

        let is_main = main_routes.contains(&initial_path);
        if !is_main {
            debug!(root = first_main, deep_link = initial_path, "synthesizing main root");
            let root = self.make_entry(first_main.to_owned(), NavigationState::Null);
            self.entries.push(root);
        }
        let entry = self.make_entry(initial_path.to_owned(), NavigationState::Null);
        self.entries.push(entry);
        self.initialized = true;

        self.settle(ChangeCause::Initialize);
        Ok(())
    }

    /// Apply one navigation event.
    pub fn apply_event(&mut self, event: NavigationEvent) -> Result<(), NavigationError> {
        if !self.initialized {
            return Err(NavigationError::NotInitialized);
        }
        debug!(kind = event.kind(), "navigation event");

        match event {
            NavigationEvent::Push { path, state } => {
                let entry = self.make_entry(path, state);
                self.entries.push(entry);
                self.settle(ChangeCause::Push);
            }
            NavigationEvent::Replace { path, state } => {
                let entry = self.make_entry(path, state);
                self.entries.pop();
                self.entries.push(entry);
                self.settle(ChangeCause::Replace);
            }
            NavigationEvent::Pop => {
                if self.can_pop() {
                    self.entries.pop();
                    self.settle(ChangeCause::Pop);
                } else {
                    debug!("pop at root ignored");
                }
            }
        }
        Ok(())
    }

    /// Whether a pop would leave at least one entry with a path.
    pub fn can_pop(&self) -> bool {
        match self.entries.split_last() {
            Some((_, rest)) => rest.iter().any(ViewStackEntry::has_path),
            None => false,
        }
    }

    /// Push a path-less entry (for example an open drawer) on top.
    pub fn push_detached(&mut self, payload: P, state: NavigationState) -> Result<EntryId, NavigationError> {
        if !self.initialized {
            return Err(NavigationError::NotInitialized);
        }
        let id = self.alloc_id();
        self.entries.push(ViewStackEntry {
            id,
            path: None,
            view: View::Found(payload),
            state,
            status: EntryStatus::Initiated,
        });
        self.settle(ChangeCause::Detached);
        Ok(id)
    }

    /// Remove a path-less entry wherever it sits. Entries with a path are
    /// only removed through events, so this returns `false` for them.
    pub fn remove_detached(&mut self, id: EntryId) -> bool {
        let Some(idx) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        if self.entries[idx].has_path() {
            return false;
        }
        self.entries.remove(idx);
        self.settle(ChangeCause::Detached);
        true
    }

    /// Payload of the displayed page: the last entry with a path.
    pub fn current_view(&self) -> Option<&View<P>> {
        self.current_entry().map(|e| &e.view)
    }

    /// The displayed page entry.
    pub fn current_entry(&self) -> Option<&ViewStackEntry<P>> {
        self.entries.iter().rev().find(|e| e.has_path())
    }

    /// Path of the displayed page.
    pub fn current_path(&self) -> Option<&str> {
        self.current_entry().and_then(|e| e.path.as_deref())
    }

    /// The topmost entry, path or not.
    pub fn top(&self) -> Option<&ViewStackEntry<P>> {
        self.entries.last()
    }

    /// Look up an entry by id.
    pub fn entry(&self, id: EntryId) -> Option<&ViewStackEntry<P>> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// All entries, bottom first.
    pub fn entries(&self) -> &[ViewStackEntry<P>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with a path.
    pub fn depth(&self) -> usize {
        self.entries.iter().filter(|e| e.has_path()).count()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Subscribe to stack changes.
    pub fn subscribe(&mut self, f: impl FnMut(&NavigationChange) + 'static) -> SubscriptionId {
        self.listeners.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// One line per entry, bottom first: `<path or (detached)> [<status>]`.
    pub fn describe(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                let label = e.path.as_deref().unwrap_or("(detached)");
                let marker = if e.view.is_not_found() { " (not found)" } else { "" };
                format!("{label}{marker} [{}]", e.status)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn alloc_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    fn make_entry(&mut self, path: String, state: NavigationState) -> ViewStackEntry<P> {
        let view = match self.resolver.resolve(&path) {
            Some(payload) => View::Found(payload),
            None => {
                debug!(path = %path, "no route matched");
                View::NotFound { path: path.clone() }
            }
        };
        ViewStackEntry {
            id: self.alloc_id(),
            path: Some(path),
            view,
            state,
            status: EntryStatus::Initiated,
        }
    }

    /// Top entry becomes active, everything else background; then notify.
    fn settle(&mut self, cause: ChangeCause) {
        let last = self.entries.len().saturating_sub(1);
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.status = if i == last {
                EntryStatus::Active
            } else {
                EntryStatus::Background
            };
        }
        let change = NavigationChange {
            cause,
            current_path: self.current_path().map(str::to_owned),
            len: self.entries.len(),
        };
        self.listeners.notify(&change);
    }
}

impl<P> std::fmt::Debug for Navigator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("initialized", &self.initialized)
            .field("len", &self.entries.len())
            .field("current_path", &self.current_path())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
