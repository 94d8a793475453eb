//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`](crate::app::App) whose pages are plain strings
//! and provides methods to simulate navigation (links, pushes, back presses),
//! process queued events, and describe the view stack as text for snapshot
//! testing.

use crate::app::{App, AppConfig, AppEvent, BackOutcome};
use crate::nav::{BackButton, EntryId, NavigationError, NavigationEvent, NavigationState, View};
use crate::overlay::{Drawer, Overlay};
use crate::route::{RouteError, RouteTable};

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// Each registered template resolves to its own template string, so a test
/// can assert on which route rendered without building real pages.
///
/// # Examples
///
/// ```
/// use kui_shell::app::AppConfig;
/// use kui_shell::testing::Pilot;
///
/// let config = AppConfig::new().with_main_routes(["/home"]).with_initial_path("/home");
/// let mut pilot = Pilot::new(config, &["/home", "/item/:id"]).unwrap();
/// pilot.push("/item/7");
/// pilot.process().unwrap();
/// assert_eq!(pilot.current_page(), Some("/item/:id"));
/// ```
pub struct Pilot {
    app: App<String>,
    button: BackButton,
}

impl Pilot {
    /// Create a session with a route per template.
    pub fn new(config: AppConfig, templates: &[&str]) -> Result<Self, PilotError> {
        let mut routes = RouteTable::new();
        for template in templates {
            let page = (*template).to_owned();
            routes.add(template, move |_| page.clone())?;
        }
        Self::with_routes(config, routes)
    }

    /// Create a session over an existing route table.
    pub fn with_routes(config: AppConfig, routes: RouteTable<String>) -> Result<Self, PilotError> {
        let mut app = App::new(config, routes)?;
        let mut button = BackButton::new();
        app.connect_back_signal(&mut button);
        Ok(Self { app, button })
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Enqueue a push.
    pub fn push(&mut self, path: &str) {
        self.app.navigate(path);
    }

    /// Enqueue a push carrying `state`.
    pub fn push_with_state(&mut self, path: &str, state: NavigationState) {
        self.app
            .send(AppEvent::Navigate(NavigationEvent::push(path).with_state(state)));
    }

    /// Enqueue a replace.
    pub fn replace(&mut self, path: &str) {
        self.app
            .send(AppEvent::Navigate(NavigationEvent::replace(path)));
    }

    /// Enqueue a history pop.
    pub fn pop(&mut self) {
        self.app.send(AppEvent::Navigate(NavigationEvent::Pop));
    }

    /// Press the hardware back button; the signal is queued like any event.
    pub fn press_back(&mut self) {
        self.button.press();
    }

    /// Press back and handle it immediately.
    pub fn back(&mut self) -> Result<BackOutcome, NavigationError> {
        self.process()?;
        self.app.handle_back()
    }

    /// Open `overlay` against this session's back handlers.
    pub fn open_overlay(&mut self, overlay: &Overlay) {
        overlay.open(&mut self.app.back_handlers);
    }

    /// Open `drawer` on this session's view stack.
    pub fn open_drawer(&mut self, drawer: &mut Drawer<String>) -> Result<EntryId, NavigationError> {
        drawer.open(&mut self.app.navigator)
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Process all pending events. Returns how many were applied.
    pub fn process(&mut self) -> Result<usize, NavigationError> {
        self.app.process()
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Borrow the underlying app immutably.
    pub fn app(&self) -> &App<String> {
        &self.app
    }

    /// Borrow the underlying app mutably.
    pub fn app_mut(&mut self) -> &mut App<String> {
        &mut self.app
    }

    /// Template of the displayed page, `None` for not-found or an empty stack.
    pub fn current_page(&self) -> Option<&str> {
        match self.app.current_view()? {
            View::Found(page) => Some(page.as_str()),
            View::NotFound { .. } => None,
        }
    }

    pub fn current_path(&self) -> Option<&str> {
        self.app.current_path()
    }

    /// Paths on the stack, bottom first; path-less entries are skipped.
    pub fn paths(&self) -> Vec<&str> {
        self.app
            .navigator
            .entries()
            .iter()
            .filter_map(|e| e.path.as_deref())
            .collect()
    }

    /// One line per stack entry, for snapshots.
    pub fn describe(&self) -> String {
        self.app.navigator.describe()
    }
}

impl std::fmt::Debug for Pilot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pilot").field("app", &self.app).finish()
    }
}

/// Why a pilot session could not start.
#[derive(Debug, thiserror::Error)]
pub enum PilotError {
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pilot_at(path: &str) -> Pilot {
        let config = AppConfig::new()
            .with_main_routes(["/home", "/search"])
            .with_initial_path(path);
        Pilot::new(config, &["/home", "/search", "/post/:id"]).unwrap()
    }

    #[test]
    fn pilot_starts_on_initial_path() {
        let pilot = pilot_at("/search");
        assert_eq!(pilot.current_page(), Some("/search"));
        assert_eq!(pilot.paths(), vec!["/search"]);
    }

    #[test]
    fn pilot_push_and_process() {
        let mut pilot = pilot_at("/home");
        pilot.push("/post/1");
        pilot.push("/post/2");
        assert_eq!(pilot.process().unwrap(), 2);
        assert_eq!(pilot.current_path(), Some("/post/2"));
        assert_eq!(pilot.current_page(), Some("/post/:id"));
    }

    #[test]
    fn pilot_unknown_path_is_not_found() {
        let mut pilot = pilot_at("/home");
        pilot.push("/nowhere");
        pilot.process().unwrap();
        assert_eq!(pilot.current_page(), None);
        assert_eq!(pilot.current_path(), Some("/nowhere"));
    }

    #[test]
    fn pilot_back_button_is_queued() {
        let mut pilot = pilot_at("/post/5");
        pilot.press_back();
        assert_eq!(pilot.app().pending_count(), 1);
        pilot.process().unwrap();
        assert_eq!(pilot.paths(), vec!["/home"]);
    }

    #[test]
    fn pilot_back_at_root() {
        let mut pilot = pilot_at("/home");
        assert_eq!(pilot.back().unwrap(), BackOutcome::AtRoot);
    }

    #[test]
    fn pilot_overlay_intercepts_back() {
        let mut pilot = pilot_at("/post/5");
        let overlay = Overlay::new();
        pilot.open_overlay(&overlay);
        assert!(overlay.is_open());

        pilot.press_back();
        pilot.process().unwrap();
        assert!(!overlay.is_open());
        assert_eq!(pilot.current_path(), Some("/post/5"));
    }

    #[test]
    fn pilot_bad_template_fails() {
        let result = Pilot::new(AppConfig::new(), &["/a/:id/:id"]);
        assert!(matches!(result, Err(PilotError::Route(_))));
    }
}
