//! In-app links.
//!
//! A [`Link`] turns a click into a `push` for internal hrefs and leaves
//! external ones (anything starting with `http`) to the host.

use super::event::{EventSender, NavigationEvent};
use crate::app::AppEvent;

/// A navigable link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    /// Whether the host should open this href itself.
    pub fn is_external(&self) -> bool {
        self.href.starts_with("http")
    }

    /// The event a click produces, if any.
    pub fn navigation(&self) -> Option<NavigationEvent> {
        (!self.is_external()).then(|| NavigationEvent::push(self.href.clone()))
    }

    /// Handle a click. Returns `true` if an in-app navigation was queued.
    pub fn click(&self, sender: &EventSender<AppEvent>) -> bool {
        match self.navigation() {
            Some(event) => {
                sender.send(AppEvent::Navigate(event));
                true
            }
            None => false,
        }
    }

    /// Whether this link points at the displayed page (for highlighting).
    pub fn is_active(&self, current_path: Option<&str>) -> bool {
        current_path == Some(self.href.as_str())
    }
}
