//! Collaborators the update gate drives.
//!
//! Network checks, bundle download/apply, and device info are host concerns;
//! the gate only sees these traits. All are single-threaded (`?Send`), as they
//! run on the UI event loop.

use std::fmt;

use async_trait::async_trait;

use super::bundle::{AutoUpdatePreference, UpdateBundle};

/// Failure reported by a collaborator. Only ever logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Asks the update server what the newest bundle is for a channel.
#[async_trait(?Send)]
pub trait VersionCheck {
    async fn check_update(
        &self,
        preference: AutoUpdatePreference,
    ) -> Result<Option<UpdateBundle>, CollaboratorError>;
}

/// Handle to a downloaded, not yet applied bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRef(pub String);

impl fmt::Display for BundleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Downloads and installs hot-patch bundles.
#[async_trait(?Send)]
pub trait BundleUpdater {
    async fn download(&self, bundle_url: &str, version: u64) -> Result<BundleRef, CollaboratorError>;

    async fn apply(&self, bundle: &BundleRef) -> Result<(), CollaboratorError>;

    /// Tell the updater the running bundle started fine, so it is not rolled back.
    async fn notify_ready(&self) -> Result<(), CollaboratorError>;
}

/// Where the app is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Platform {
    Ios,
    #[default]
    Android,
    /// A browser build; hot updates do not apply.
    Web,
}

impl Platform {
    pub fn is_native(&self) -> bool {
        *self != Self::Web
    }
}

/// Installed binary information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Store build number, as reported by the OS.
    pub build: String,
}

/// Reports the installed binary and platform.
#[async_trait(?Send)]
pub trait DeviceInfo {
    fn platform(&self) -> Platform;

    async fn app_info(&self) -> Result<AppInfo, CollaboratorError>;
}
