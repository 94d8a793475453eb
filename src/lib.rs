//! # kui-shell
//!
//! The navigation and hot-update core of a mobile app shell.
//!
//! kui-shell keeps a stack of pages driven by URL-like paths, lets overlays
//! and drawers cooperate with the back button, and decides on each start
//! whether a newer code bundle should be applied silently, offered, or
//! required before the app may be used. Rendering is left to the host: pages
//! are an opaque payload type `P` produced by a route resolver.
//!
//! ## Core Systems
//!
//! - **[`route`]**: route templates, parameter capture, resolution table
//! - **[`nav`]**: the view-stack state machine, navigation events, back handlers, links
//! - **[`overlay`]**: back-intercepting overlays and view-stack drawers
//! - **[`app`]**: the session object that owns navigation and processes events in order
//! - **[`update`]**: update bundles, the decision table, and the async update gate
//! - **[`theme`]**: theme resolution, style variable export, system bar styling
//! - **[`persist`]**: async key-value storage and JSON helpers
//! - **[`state`]**: subscriber lists and observable cells
//! - **[`testing`]**: a headless [`Pilot`](testing::Pilot) and collaborator fakes

// Foundation
pub mod persist;
pub mod state;

// Navigation
pub mod nav;
pub mod overlay;
pub mod route;

// Hot updates and theming
pub mod theme;
pub mod update;

// Application
pub mod app;

// Test support
pub mod testing;
