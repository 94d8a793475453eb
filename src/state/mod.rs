//! Explicit state containers with subscribe/notify.
//!
//! - [`Listeners`]: subscriber list owned by a state machine.
//! - [`Observable`]: shared cell that notifies on write.

pub mod listeners;
pub mod observable;

pub use listeners::{Listeners, SubscriptionId};
pub use observable::Observable;
