//! The update gate state machine.
//!
//! [`UpdateGate`] runs once per session start and once per preference change:
//! it checks for a newer bundle, then either applies it silently, blocks the
//! app behind a mandatory-update notice, or does nothing. Collaborator
//! failures never escape; they are logged and the app keeps running on the
//! bundle it has. Calls take `&mut self`, so only one check is ever in
//! flight and the most recent run's result is the one that stands.

use std::fmt;

use tracing::{debug, info, warn};

use super::bundle::{AutoUpdatePreference, CurrentBundle, UpdateBundle};
use super::collab::{BundleUpdater, CollaboratorError, DeviceInfo, Platform, VersionCheck};
use super::decision::{self, Decision};
use crate::persist::{
    self, KeyValueStore, StoreError, AUTO_UPDATE_PREFERENCE_KEY, CURRENT_BUNDLE_KEY,
};
use crate::state::{Listeners, SubscriptionId};

/// Failures inside the gate pipeline. Logged, never returned to the host.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("version check failed: {0}")]
    Check(#[source] CollaboratorError),
    #[error("bundle download failed: {0}")]
    Download(#[source] CollaboratorError),
    #[error("bundle apply failed: {0}")]
    Apply(#[source] CollaboratorError),
    #[error("ready notification failed: {0}")]
    NotifyReady(#[source] CollaboratorError),
    #[error("device info unavailable: {0}")]
    DeviceInfo(#[source] CollaboratorError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// UpdateConfig
// ---------------------------------------------------------------------------

/// Store links and presentation options for the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateConfig {
    pub app_store_url: String,
    pub play_store_url: String,
    /// Show an updating screen instead of the app while a bundle downloads.
    pub show_updating_view: bool,
}

impl UpdateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iOS store link (builder).
    pub fn with_app_store_url(mut self, url: impl Into<String>) -> Self {
        self.app_store_url = url.into();
        self
    }

    /// Set the Android store link (builder).
    pub fn with_play_store_url(mut self, url: impl Into<String>) -> Self {
        self.play_store_url = url.into();
        self
    }

    /// Toggle the updating screen (builder).
    pub fn with_updating_view(mut self, show: bool) -> Self {
        self.show_updating_view = show;
        self
    }
}

// ---------------------------------------------------------------------------
// GateState / Screen
// ---------------------------------------------------------------------------

/// What the blocking screen needs to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MandatoryNotice {
    pub store_name: &'static str,
    pub store_url: String,
    pub current_version: u64,
    /// Raw installed build string, empty if unknown.
    pub build: String,
    pub available_version: u64,
}

impl MandatoryNotice {
    pub fn message(&self) -> String {
        format!(
            "An update is available. Please download the latest version from the {}",
            self.store_name
        )
    }

    /// Compact support string: `cb<current>-bb<build>-ab<available>`. A
    /// running version of 0 shows the build string instead.
    pub fn diagnostic(&self) -> String {
        let build = if self.build.is_empty() { "unknown" } else { &self.build };
        let current = match self.current_version {
            0 => build.to_owned(),
            v => v.to_string(),
        };
        format!("cb{current}-bb{build}-ab{}", self.available_version)
    }
}

/// Gate lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Not started, or reset by a preference change.
    Idle,
    /// Waiting on the version check.
    Checking,
    /// Nothing to do. Also covers an optional update the host may surface.
    UpToDate,
    /// Downloading and applying `version`.
    AutoUpdating { version: u64 },
    /// Silent update of `version` failed; the previous bundle stays active.
    Checked { version: u64 },
    /// The running version is below the mandatory threshold.
    MandatoryBlocked(MandatoryNotice),
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Checking => f.write_str("checking"),
            Self::UpToDate => f.write_str("up-to-date"),
            Self::AutoUpdating { version } => write!(f, "auto-updating to {version}"),
            Self::Checked { version } => write!(f, "update to {version} failed"),
            Self::MandatoryBlocked(n) => write!(f, "blocked until {}", n.available_version),
        }
    }
}

/// What the host should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// The app itself.
    Children,
    /// The updating screen.
    Updating,
    /// The mandatory-update screen; the app must not be shown.
    Blocked(MandatoryNotice),
}

// ---------------------------------------------------------------------------
// UpdateGate
// ---------------------------------------------------------------------------

/// Version-gated auto-update decision engine.
pub struct UpdateGate {
    config: UpdateConfig,
    checker: Box<dyn VersionCheck>,
    updater: Box<dyn BundleUpdater>,
    device: Box<dyn DeviceInfo>,
    store: Box<dyn KeyValueStore>,
    state: GateState,
    update: Option<UpdateBundle>,
    preference: AutoUpdatePreference,
    ready_notified: bool,
    listeners: Listeners<GateState>,
}

impl UpdateGate {
    pub fn new(
        config: UpdateConfig,
        checker: impl VersionCheck + 'static,
        updater: impl BundleUpdater + 'static,
        device: impl DeviceInfo + 'static,
        store: impl KeyValueStore + 'static,
    ) -> Self {
        Self {
            config,
            checker: Box::new(checker),
            updater: Box::new(updater),
            device: Box::new(device),
            store: Box::new(store),
            state: GateState::Idle,
            update: None,
            preference: AutoUpdatePreference::default(),
            ready_notified: false,
            listeners: Listeners::new(),
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Result of the latest version check, including stale or optional ones.
    pub fn update(&self) -> Option<&UpdateBundle> {
        self.update.as_ref()
    }

    /// Preference used by the latest run.
    pub fn preference(&self) -> AutoUpdatePreference {
        self.preference
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// What to render for the current state.
    pub fn screen(&self) -> Screen {
        match &self.state {
            GateState::MandatoryBlocked(notice) => Screen::Blocked(notice.clone()),
            GateState::AutoUpdating { .. } if self.config.show_updating_view => Screen::Updating,
            _ => Screen::Children,
        }
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&mut self, f: impl FnMut(&GateState) + 'static) -> SubscriptionId {
        self.listeners.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Run the check/decide/apply pipeline.
    pub async fn start(&mut self) -> &GateState {
        let platform = self.device.platform();
        if !platform.is_native() {
            debug!("web build, hot updates disabled");
            self.transition(GateState::UpToDate);
            return &self.state;
        }

        if !self.ready_notified {
            self.ready_notified = true;
            if let Err(e) = self.updater.notify_ready().await {
                log_failure(&UpdateError::NotifyReady(e));
            }
        }

        self.transition(GateState::Checking);
        self.preference = self.stored_preference().await;

        let build = match self.device.app_info().await {
            Ok(info) => info.build,
            Err(e) => {
                log_failure(&UpdateError::DeviceInfo(e));
                String::new()
            }
        };
        let installed = decision::installed_build_number(&build);
        let current = self.reconciled_bundle(installed).await;
        let current_version = decision::current_version(current.as_ref(), installed);

        let update = match self.checker.check_update(self.preference).await {
            Ok(update) => update,
            Err(e) => {
                log_failure(&UpdateError::Check(e));
                None
            }
        };
        if let Some(bundle) = update.as_ref().filter(|b| !b.is_consistent()) {
            warn!(
                version = bundle.version,
                last_compatible = bundle.last_compatible_version,
                last_mandatory = bundle.last_mandatory_version,
                "update bundle thresholds out of order"
            );
        }
        self.update = update.clone();

        let decision = decision::decide(update.as_ref(), current_version, self.preference);
        info!(?decision, current_version, preference = %self.preference, "update check complete");

        match (decision, update) {
            (Decision::AutoUpdate, Some(bundle)) => self.auto_update(bundle).await,
            (Decision::Mandatory, Some(bundle)) => {
                let notice = self.notice(platform, &bundle, current_version, build);
                self.transition(GateState::MandatoryBlocked(notice));
            }
            _ => self.transition(GateState::UpToDate),
        }
        &self.state
    }

    /// Persist a new preference and, if it changed, re-run the check.
    pub async fn set_preference(&mut self, preference: AutoUpdatePreference) -> &GateState {
        let previous = self.stored_preference().await;
        if let Err(e) = self
            .store
            .set(AUTO_UPDATE_PREFERENCE_KEY, Some(preference.as_str().to_owned()))
            .await
        {
            log_failure(&UpdateError::Store(e));
        }
        if previous == preference && self.state != GateState::Idle {
            self.preference = preference;
            return &self.state;
        }
        self.transition(GateState::Idle);
        self.start().await
    }

    /// The persisted preference, or the default if unset or unreadable.
    pub async fn stored_preference(&self) -> AutoUpdatePreference {
        match self.store.get(AUTO_UPDATE_PREFERENCE_KEY).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "ignoring stored auto-update preference");
                AutoUpdatePreference::default()
            }),
            Ok(None) => AutoUpdatePreference::default(),
            Err(e) => {
                log_failure(&UpdateError::Store(e));
                AutoUpdatePreference::default()
            }
        }
    }

    /// The persisted applied bundle, if readable.
    pub async fn current_bundle(&self) -> Option<CurrentBundle> {
        match persist::load_json(&*self.store, CURRENT_BUNDLE_KEY).await {
            Ok(bundle) => bundle,
            Err(e) => {
                log_failure(&UpdateError::Store(e));
                None
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Load the applied bundle, discarding it if the installed binary is newer.
    async fn reconciled_bundle(&self, installed: u64) -> Option<CurrentBundle> {
        let current = self.current_bundle().await;
        if !decision::should_discard(current.as_ref(), installed) {
            return current;
        }
        info!(
            bundle = current.as_ref().map(|b| b.version),
            installed, "installed binary is newer than applied bundle, discarding it"
        );
        if let Err(e) = persist::save_json::<CurrentBundle>(&*self.store, CURRENT_BUNDLE_KEY, None).await {
            log_failure(&UpdateError::Store(e));
        }
        None
    }

    async fn auto_update(&mut self, bundle: UpdateBundle) {
        let version = bundle.version;
        self.transition(GateState::AutoUpdating { version });
        match self.download_and_apply(&bundle).await {
            Ok(()) => {
                info!(version, "bundle applied");
                self.transition(GateState::UpToDate);
            }
            Err(e) => {
                log_failure(&e);
                self.transition(GateState::Checked { version });
            }
        }
    }

    async fn download_and_apply(&self, bundle: &UpdateBundle) -> Result<(), UpdateError> {
        let downloaded = self
            .updater
            .download(&bundle.bundle_url, bundle.version)
            .await
            .map_err(UpdateError::Download)?;
        self.updater
            .apply(&downloaded)
            .await
            .map_err(UpdateError::Apply)?;
        persist::save_json(&*self.store, CURRENT_BUNDLE_KEY, Some(bundle)).await?;
        Ok(())
    }

    fn notice(
        &self,
        platform: Platform,
        bundle: &UpdateBundle,
        current_version: u64,
        build: String,
    ) -> MandatoryNotice {
        let (store_name, store_url) = match platform {
            Platform::Ios => ("App Store", self.config.app_store_url.clone()),
            _ => ("Google Play Store", self.config.play_store_url.clone()),
        };
        MandatoryNotice {
            store_name,
            store_url,
            current_version,
            build,
            available_version: bundle.version,
        }
    }

    fn transition(&mut self, next: GateState) {
        if self.state == next {
            return;
        }
        debug!(from = %self.state, to = %next, "update gate transition");
        self.state = next;
        self.listeners.notify(&self.state);
    }
}

impl fmt::Debug for UpdateGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateGate")
            .field("state", &self.state)
            .field("preference", &self.preference)
            .field("update", &self.update)
            .finish()
    }
}

fn log_failure(error: &UpdateError) {
    warn!(error = %error, "update pipeline step failed");
}

// ===========================================================================
// Tests
// ===========================================================================
