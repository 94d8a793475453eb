//! Overlay primitives that cooperate with navigation.
//!
//! - [`Overlay`]: intercepts the back signal while open.
//! - [`Drawer`]: occupies a path-less view-stack entry while open.

pub mod drawer;
pub mod modal;

pub use drawer::Drawer;
pub use modal::Overlay;
