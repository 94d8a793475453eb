//! Navigation: view stack, events, back-button interception, links.
//!
//! - [`Navigator`]: the view-stack state machine.
//! - [`NavigationEvent`], [`EventQueue`], [`EventSender`]: in-order event delivery.
//! - [`BackHandlers`], [`BackButton`]: back-signal interception.
//! - [`Link`]: click-to-push links.

pub mod back;
pub mod entry;
pub mod event;
pub mod link;
pub mod navigator;

pub use back::{BackButton, BackHandlers, BackSignalSource};
pub use entry::{EntryId, EntryStatus, NavigationState, View, ViewStackEntry};
pub use event::{EventQueue, EventSender, NavigationEvent};
pub use link::Link;
pub use navigator::{ChangeCause, NavigationChange, NavigationError, Navigator};
