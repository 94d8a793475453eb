//! Scriptable collaborators for driving an [`UpdateGate`](crate::update::UpdateGate).
//!
//! Each fake is a cheap handle over shared state: clone it, hand one clone to
//! the gate, and keep the other to script responses and inspect calls.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::update::{
    AppInfo, AutoUpdatePreference, BundleRef, BundleUpdater, CollaboratorError, DeviceInfo,
    Platform, UpdateBundle, VersionCheck,
};

// ---------------------------------------------------------------------------
// FakeVersionCheck
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct CheckInner {
    response: Result<Option<UpdateBundle>, CollaboratorError>,
    calls: Vec<AutoUpdatePreference>,
    delay: Option<Duration>,
}

/// Version check returning a scripted response.
#[derive(Debug, Clone)]
pub struct FakeVersionCheck {
    inner: Rc<RefCell<CheckInner>>,
}

impl Default for FakeVersionCheck {
    fn default() -> Self {
        Self::none()
    }
}

impl FakeVersionCheck {
    /// Reports no update.
    pub fn none() -> Self {
        Self::responding(Ok(None))
    }

    /// Reports `bundle`.
    pub fn returning(bundle: UpdateBundle) -> Self {
        Self::responding(Ok(Some(bundle)))
    }

    /// Fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::responding(Err(CollaboratorError::new(message)))
    }

    fn responding(response: Result<Option<UpdateBundle>, CollaboratorError>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CheckInner {
                response,
                calls: Vec::new(),
                delay: None,
            })),
        }
    }

    /// Sleep before answering (builder).
    pub fn with_delay(self, delay: Duration) -> Self {
        self.inner.borrow_mut().delay = Some(delay);
        self
    }

    /// Change what later checks report.
    pub fn set_response(&self, bundle: Option<UpdateBundle>) {
        self.inner.borrow_mut().response = Ok(bundle);
    }

    /// Preferences passed to each check so far.
    pub fn calls(&self) -> Vec<AutoUpdatePreference> {
        self.inner.borrow().calls.clone()
    }
}

#[async_trait(?Send)]
impl VersionCheck for FakeVersionCheck {
    async fn check_update(
        &self,
        preference: AutoUpdatePreference,
    ) -> Result<Option<UpdateBundle>, CollaboratorError> {
        let delay = {
            let mut inner = self.inner.borrow_mut();
            inner.calls.push(preference);
            inner.delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.borrow().response.clone()
    }
}

// ---------------------------------------------------------------------------
// FakeUpdater
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct UpdaterInner {
    downloads: Vec<(String, u64)>,
    applied: Vec<BundleRef>,
    ready_calls: usize,
    download_error: Option<String>,
    apply_error: Option<String>,
}

/// Bundle updater recording downloads and applies.
#[derive(Debug, Clone, Default)]
pub struct FakeUpdater {
    inner: Rc<RefCell<UpdaterInner>>,
}

impl FakeUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make downloads fail (builder).
    pub fn failing_download(self, message: &str) -> Self {
        self.inner.borrow_mut().download_error = Some(message.to_owned());
        self
    }

    /// Make applies fail (builder).
    pub fn failing_apply(self, message: &str) -> Self {
        self.inner.borrow_mut().apply_error = Some(message.to_owned());
        self
    }

    /// `(url, version)` of each download.
    pub fn downloads(&self) -> Vec<(String, u64)> {
        self.inner.borrow().downloads.clone()
    }

    pub fn applied(&self) -> Vec<BundleRef> {
        self.inner.borrow().applied.clone()
    }

    pub fn ready_calls(&self) -> usize {
        self.inner.borrow().ready_calls
    }
}

#[async_trait(?Send)]
impl BundleUpdater for FakeUpdater {
    async fn download(&self, bundle_url: &str, version: u64) -> Result<BundleRef, CollaboratorError> {
        let mut inner = self.inner.borrow_mut();
        inner.downloads.push((bundle_url.to_owned(), version));
        match &inner.download_error {
            Some(message) => Err(CollaboratorError::new(message.clone())),
            None => Ok(BundleRef(format!("bundle-{version}"))),
        }
    }

    async fn apply(&self, bundle: &BundleRef) -> Result<(), CollaboratorError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(message) = &inner.apply_error {
            return Err(CollaboratorError::new(message.clone()));
        }
        inner.applied.push(bundle.clone());
        Ok(())
    }

    async fn notify_ready(&self) -> Result<(), CollaboratorError> {
        self.inner.borrow_mut().ready_calls += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FakeDevice
// ---------------------------------------------------------------------------

/// Device reporting a fixed platform and build.
#[derive(Debug, Clone)]
pub struct FakeDevice {
    platform: Platform,
    build: Result<String, CollaboratorError>,
}

impl FakeDevice {
    pub fn android(build: &str) -> Self {
        Self {
            platform: Platform::Android,
            build: Ok(build.to_owned()),
        }
    }

    pub fn ios(build: &str) -> Self {
        Self {
            platform: Platform::Ios,
            build: Ok(build.to_owned()),
        }
    }

    pub fn web() -> Self {
        Self {
            platform: Platform::Web,
            build: Ok(String::new()),
        }
    }

    /// A native device whose app info lookup fails.
    pub fn unavailable(platform: Platform) -> Self {
        Self {
            platform,
            build: Err(CollaboratorError::new("app info unavailable")),
        }
    }
}

#[async_trait(?Send)]
impl DeviceInfo for FakeDevice {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn app_info(&self) -> Result<AppInfo, CollaboratorError> {
        self.build.clone().map(|build| AppInfo { build })
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn version_check_records_calls() {
        let check = FakeVersionCheck::returning(UpdateBundle::new(5, "u"));
        let handle = check.clone();
        let result = check.check_update(AutoUpdatePreference::Beta).await.unwrap();
        assert_eq!(result.map(|b| b.version), Some(5));
        assert_eq!(handle.calls(), vec![AutoUpdatePreference::Beta]);
    }

    #[tokio::test]
    async fn updater_failures_are_scripted() {
        let updater = FakeUpdater::new().failing_apply("disk full");
        let bundle = updater.download("u", 3).await.unwrap();
        assert_eq!(bundle, BundleRef("bundle-3".into()));
        assert!(updater.apply(&bundle).await.is_err());
        assert!(updater.applied().is_empty());
    }

    #[tokio::test]
    async fn unavailable_device_errors() {
        let device = FakeDevice::unavailable(Platform::Ios);
        assert_eq!(device.platform(), Platform::Ios);
        assert!(device.app_info().await.is_err());
    }
}
