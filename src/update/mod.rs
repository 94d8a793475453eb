//! Hot-update gating: version check, auto-apply, mandatory-update blocking.
//!
//! - [`bundle`]: bundle metadata and the channel preference
//! - [`decision`]: the pure decision table
//! - [`collab`]: host collaborator traits
//! - [`gate`]: the async [`UpdateGate`] state machine

pub mod bundle;
pub mod collab;
pub mod decision;
pub mod gate;

pub use bundle::{AutoUpdatePreference, CurrentBundle, UnknownPreference, UpdateBundle};
pub use collab::{
    AppInfo, BundleRef, BundleUpdater, CollaboratorError, DeviceInfo, Platform, VersionCheck,
};
pub use decision::{decide, Decision};
pub use gate::{GateState, MandatoryNotice, Screen, UpdateConfig, UpdateError, UpdateGate};
