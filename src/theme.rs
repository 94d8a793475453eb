//! Color themes: selection, resolution, and export to the host.
//!
//! A [`ThemeConfig`] lists the available themes. The user picks a
//! [`ThemePreference`], either `system` (follow the OS dark-mode flag) or a
//! theme name; [`ThemeController`] persists it, resolves it to the active
//! [`Theme`], and tells subscribers when the active theme changes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::persist::{KeyValueStore, StoreError, THEME_KEY};
use crate::state::{Listeners, SubscriptionId};
use crate::update::Platform;

const FALLBACK_LIGHT: &str = "light";
const FALLBACK_DARK: &str = "dark";

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Light or dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Light,
    Dark,
}

/// Shade (50, 100, ... 950) to color value.
pub type Palette = BTreeMap<u16, String>;

/// A named set of palettes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ThemeKind,
    /// Palette name (`primary`, `accent`, ...) to shades.
    pub properties: BTreeMap<String, Palette>,
}

impl Theme {
    pub fn new(name: impl Into<String>, kind: ThemeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            properties: BTreeMap::new(),
        }
    }

    /// Add a palette (builder).
    pub fn with_palette<C: Into<String>>(
        mut self,
        name: impl Into<String>,
        shades: impl IntoIterator<Item = (u16, C)>,
    ) -> Self {
        let palette = shades.into_iter().map(|(s, c)| (s, c.into())).collect();
        self.properties.insert(name.into(), palette);
        self
    }

    pub fn is_dark(&self) -> bool {
        self.kind == ThemeKind::Dark
    }

    /// Style variables for every palette shade, as
    /// `(--kui-color-<palette>-<shade>, color)`, palettes then shades ascending.
    pub fn css_variables(&self) -> Vec<(String, String)> {
        self.properties
            .iter()
            .flat_map(|(palette, shades)| {
                shades
                    .iter()
                    .map(move |(shade, color)| (format!("--kui-color-{palette}-{shade}"), color.clone()))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// NativeChrome
// ---------------------------------------------------------------------------

/// Status bar text style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBarStyle {
    Light,
    Dark,
}

/// System bar styling to apply alongside a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeChrome {
    pub status_bar: StatusBarStyle,
    /// Dark navigation-bar buttons (for light themes).
    pub dark_nav_buttons: bool,
}

impl NativeChrome {
    /// Styling for `theme` on `platform`; `None` where the system bars are
    /// left alone (web and iOS).
    pub fn for_theme(theme: &Theme, platform: Platform) -> Option<Self> {
        if !platform.is_native() || platform == Platform::Ios {
            return None;
        }
        let dark = theme.is_dark();
        Some(Self {
            status_bar: if dark {
                StatusBarStyle::Dark
            } else {
                StatusBarStyle::Light
            },
            dark_nav_buttons: !dark,
        })
    }
}

// ---------------------------------------------------------------------------
// ThemeConfig
// ---------------------------------------------------------------------------

/// Available themes and the defaults `system` resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub themes: Vec<Theme>,
    /// Empty means `"light"`.
    #[serde(default)]
    pub default_light_theme: String,
    /// Empty means `"dark"`.
    #[serde(default)]
    pub default_dark_theme: String,
}

impl ThemeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a theme (builder).
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.themes.push(theme);
        self
    }

    /// Set the theme `system` picks in light mode (builder).
    pub fn with_default_light(mut self, name: impl Into<String>) -> Self {
        self.default_light_theme = name.into();
        self
    }

    /// Set the theme `system` picks in dark mode (builder).
    pub fn with_default_dark(mut self, name: impl Into<String>) -> Self {
        self.default_dark_theme = name.into();
        self
    }

    /// Name `system` resolves to for the given dark-mode flag.
    pub fn system_theme_name(&self, dark: bool) -> &str {
        let (name, fallback) = if dark {
            (&self.default_dark_theme, FALLBACK_DARK)
        } else {
            (&self.default_light_theme, FALLBACK_LIGHT)
        };
        if name.is_empty() {
            fallback
        } else {
            name
        }
    }

    /// Name a preference resolves to.
    pub fn resolve<'a>(&'a self, preference: &'a ThemePreference, dark: bool) -> &'a str {
        match preference {
            ThemePreference::System => self.system_theme_name(dark),
            ThemePreference::Named(name) => name,
        }
    }

    /// First theme called `name`.
    pub fn find(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.name == name)
    }
}

// ---------------------------------------------------------------------------
// ThemePreference
// ---------------------------------------------------------------------------

/// The user's theme choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ThemePreference {
    /// Follow the OS dark-mode setting.
    #[default]
    System,
    Named(String),
}

impl ThemePreference {
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "system" => Self::System,
            name => Self::Named(name.to_owned()),
        })
    }
}

impl From<&str> for ThemePreference {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(pref) => pref,
            Err(never) => match never {},
        }
    }
}

// ---------------------------------------------------------------------------
// ThemeController
// ---------------------------------------------------------------------------

/// Owns the theme preference for a session.
pub struct ThemeController {
    config: ThemeConfig,
    store: Box<dyn KeyValueStore>,
    preference: ThemePreference,
    system_dark: bool,
    active: Option<String>,
    listeners: Listeners<Theme>,
}

impl ThemeController {
    /// Create a controller, reading the persisted preference from `store`.
    pub async fn load(config: ThemeConfig, store: impl KeyValueStore + 'static, system_dark: bool) -> Self {
        let preference = match store.get(THEME_KEY).await {
            Ok(Some(raw)) => ThemePreference::from(raw.as_str()),
            Ok(None) => ThemePreference::System,
            Err(e) => {
                warn!(error = %e, "theme preference unreadable, following system");
                ThemePreference::System
            }
        };
        let mut controller = Self {
            config,
            store: Box::new(store),
            preference,
            system_dark,
            active: None,
            listeners: Listeners::new(),
        };
        controller.active = controller.active_theme().map(|t| t.name.clone());
        controller
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn preference(&self) -> &ThemePreference {
        &self.preference
    }

    pub fn system_dark(&self) -> bool {
        self.system_dark
    }

    /// Name the current preference resolves to.
    pub fn resolved_name(&self) -> &str {
        self.config.resolve(&self.preference, self.system_dark)
    }

    /// The theme in effect, if the resolved name is configured.
    pub fn active_theme(&self) -> Option<&Theme> {
        self.config.find(self.resolved_name())
    }

    /// The theme `system` would pick right now.
    pub fn system_theme(&self) -> Option<&Theme> {
        self.config.find(self.config.system_theme_name(self.system_dark))
    }

    /// Persist and apply a new preference.
    pub async fn set_preference(&mut self, preference: ThemePreference) -> Result<(), StoreError> {
        self.store
            .set(THEME_KEY, Some(preference.as_str().to_owned()))
            .await?;
        self.preference = preference;
        self.refresh();
        Ok(())
    }

    /// Report an OS dark-mode change.
    pub fn set_system_dark(&mut self, dark: bool) {
        self.system_dark = dark;
        self.refresh();
    }

    /// Called with the new active theme whenever it changes.
    pub fn subscribe(&mut self, f: impl FnMut(&Theme) + 'static) -> SubscriptionId {
        self.listeners.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn refresh(&mut self) {
        let Some(theme) = self.active_theme().cloned() else {
            debug!(name = self.resolved_name(), "resolved theme is not configured");
            self.active = None;
            return;
        };
        if self.active.as_deref() == Some(theme.name.as_str()) {
            return;
        }
        debug!(theme = %theme.name, "active theme changed");
        self.active = Some(theme.name.clone());
        self.listeners.notify(&theme);
    }
}

impl fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("preference", &self.preference)
            .field("system_dark", &self.system_dark)
            .field("active", &self.active)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
