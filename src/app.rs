//! App struct: session ownership, in-order event processing.
//!
//! [`App`] owns the navigator, the back-handler registry, and the event queue
//! for one UI session. Host bridges hold an [`EventSender`] and enqueue
//! [`AppEvent`]s; [`App::process`] applies them strictly in arrival order.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::nav::{
    BackHandlers, BackSignalSource, EventQueue, EventSender, NavigationError, NavigationEvent,
    Navigator, View,
};
use crate::route::Resolver;
use crate::state::SubscriptionId;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for a navigation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Top-level routes; the first one is the fallback root for deep links.
    pub main_routes: Vec<String>,
    /// Path the session starts on.
    pub initial_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            main_routes: vec!["/".to_string()],
            initial_path: "/".to_string(),
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the main routes (builder).
    pub fn with_main_routes(mut self, routes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.main_routes = routes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the starting path (builder).
    pub fn with_initial_path(mut self, path: impl Into<String>) -> Self {
        self.initial_path = path.into();
        self
    }
}

// ---------------------------------------------------------------------------
// AppEvent
// ---------------------------------------------------------------------------

/// Everything a host can feed into a session.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A history event.
    Navigate(NavigationEvent),
    /// A hardware/OS back signal.
    Back,
}

/// How a back signal was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackOutcome {
    /// A registered handler ran instead of navigation.
    Intercepted(String),
    /// The stack was popped.
    Popped,
    /// Already at the root; nothing happened.
    AtRoot,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// One UI session.
pub struct App<P> {
    /// The view-stack state machine.
    pub navigator: Navigator<P>,
    /// Back-signal interceptors (open overlays).
    pub back_handlers: BackHandlers,
    /// Session configuration.
    pub config: AppConfig,
    queue: Rc<RefCell<EventQueue<AppEvent>>>,
    back_subscription: Option<SubscriptionId>,
}

impl<P> App<P> {
    /// Create a session and seed its view stack from `config`.
    pub fn new(config: AppConfig, resolver: impl Resolver<P> + 'static) -> Result<Self, NavigationError> {
        let mut navigator = Navigator::new(resolver);
        navigator.initialize(&config.initial_path, config.main_routes.as_slice())?;
        Ok(Self {
            navigator,
            back_handlers: BackHandlers::new(),
            config,
            queue: Rc::new(RefCell::new(EventQueue::new())),
            back_subscription: None,
        })
    }

    /// A producer handle for host bridges.
    pub fn sender(&self) -> EventSender<AppEvent> {
        EventSender::new(Rc::clone(&self.queue))
    }

    /// Enqueue an event without processing it.
    pub fn send(&self, event: AppEvent) {
        self.queue.borrow_mut().push(event);
    }

    /// Enqueue a push to `path`.
    pub fn navigate(&self, path: impl Into<String>) {
        self.send(AppEvent::Navigate(NavigationEvent::push(path)));
    }

    /// Number of events waiting to be processed.
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().pending_count()
    }

    /// Apply all pending events in arrival order, including any enqueued
    /// while processing. Returns how many were applied.
    pub fn process(&mut self) -> Result<usize, NavigationError> {
        let mut applied = 0;
        loop {
            // The borrow must end before the event runs: handlers may send.
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else { break };
            self.handle_event(event)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Apply one event immediately.
    pub fn handle_event(&mut self, event: AppEvent) -> Result<(), NavigationError> {
        match event {
            AppEvent::Navigate(nav) => self.navigator.apply_event(nav),
            AppEvent::Back => self.handle_back().map(|_| ()),
        }
    }

    /// Route a back signal to the newest handler, or pop.
    pub fn handle_back(&mut self) -> Result<BackOutcome, NavigationError> {
        if let Some(id) = self.back_handlers.dispatch() {
            return Ok(BackOutcome::Intercepted(id));
        }
        if !self.navigator.can_pop() {
            debug!("back at root");
            return Ok(BackOutcome::AtRoot);
        }
        self.navigator.apply_event(NavigationEvent::Pop)?;
        Ok(BackOutcome::Popped)
    }

    /// Feed back signals from `source` into this session's queue.
    ///
    /// Replaces any earlier connection made through this method; the caller
    /// is responsible for passing the same source to [`disconnect_back_signal`](Self::disconnect_back_signal).
    pub fn connect_back_signal(&mut self, source: &mut dyn BackSignalSource) -> SubscriptionId {
        let sender = self.sender();
        let id = source.subscribe(Box::new(move || sender.send(AppEvent::Back)));
        self.back_subscription = Some(id);
        id
    }

    /// Stop receiving back signals from `source`.
    pub fn disconnect_back_signal(&mut self, source: &mut dyn BackSignalSource) -> bool {
        match self.back_subscription.take() {
            Some(id) => source.unsubscribe(id),
            None => false,
        }
    }

    /// Payload of the displayed page.
    pub fn current_view(&self) -> Option<&View<P>> {
        self.navigator.current_view()
    }

    /// Path of the displayed page.
    pub fn current_path(&self) -> Option<&str> {
        self.navigator.current_path()
    }
}

impl<P> std::fmt::Debug for App<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("navigator", &self.navigator)
            .field("back_handlers", &self.back_handlers)
            .field("pending", &self.pending_count())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
