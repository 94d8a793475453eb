//! View-stack entries.

use std::fmt;

/// Caller-supplied data carried by the navigation event that created an entry.
pub type NavigationState = serde_json::Value;

/// Stable identity of a stack entry, independent of its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) u64);

/// Lifecycle status of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    /// Reserved for an entry that is mid-transition and not yet settled.
    Initiated,
    /// The single displayed entry.
    Active,
    /// Retained but hidden.
    Background,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initiated => "initiated",
            Self::Active => "active",
            Self::Background => "background",
        })
    }
}

/// What an entry renders: a resolved payload or the not-found fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum View<P> {
    Found(P),
    NotFound { path: String },
}

impl<P> View<P> {
    /// The resolved payload, if the path was known.
    pub fn payload(&self) -> Option<&P> {
        match self {
            Self::Found(p) => Some(p),
            Self::NotFound { .. } => None,
        }
    }

    /// Whether this is the not-found fallback.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// One entry of the view stack.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewStackEntry<P> {
    pub id: EntryId,
    /// Route key. `None` for path-less entries such as an open drawer.
    pub path: Option<String>,
    pub view: View<P>,
    pub state: NavigationState,
    pub status: EntryStatus,
}

impl<P> ViewStackEntry<P> {
    /// Whether this entry has a non-empty path and so can be displayed as a page.
    pub fn has_path(&self) -> bool {
        self.path.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.status == EntryStatus::Active
    }
}
