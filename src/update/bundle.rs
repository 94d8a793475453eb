//! Bundle descriptors and the auto-update preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AutoUpdatePreference
// ---------------------------------------------------------------------------

/// Which update channel to follow, or none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AutoUpdatePreference {
    #[default]
    Production,
    Beta,
    Development,
    /// Never apply bundles silently. Mandatory updates still block.
    Disable,
}

impl AutoUpdatePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "PRODUCTION",
            Self::Beta => "BETA",
            Self::Development => "DEVELOPMENT",
            Self::Disable => "DISABLE",
        }
    }

    /// Whether silent background updates are allowed.
    pub fn allows_auto_update(&self) -> bool {
        *self != Self::Disable
    }
}

impl fmt::Display for AutoUpdatePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown preference name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown auto-update preference {0:?}")]
pub struct UnknownPreference(pub String);

impl FromStr for AutoUpdatePreference {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRODUCTION" => Ok(Self::Production),
            "BETA" => Ok(Self::Beta),
            "DEVELOPMENT" => Ok(Self::Development),
            "DISABLE" => Ok(Self::Disable),
            other => Err(UnknownPreference(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// UpdateBundle
// ---------------------------------------------------------------------------

/// A deployable code bundle as reported by the version check.
///
/// Expected ordering is `last_compatible_version <= last_mandatory_version
/// <= version`; see [`is_consistent`](Self::is_consistent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBundle {
    pub version: u64,
    /// Oldest running version this bundle may be applied to silently.
    pub last_compatible_version: u64,
    /// Running versions below this must update before use. Records written
    /// before this field existed read it as 0 (never mandatory).
    #[serde(default)]
    pub last_mandatory_version: u64,
    /// Opaque locator handed to the downloader.
    pub bundle_url: String,
}

/// The last bundle successfully applied on this device.
pub type CurrentBundle = UpdateBundle;

impl UpdateBundle {
    pub fn new(version: u64, bundle_url: impl Into<String>) -> Self {
        Self {
            version,
            last_compatible_version: 0,
            last_mandatory_version: 0,
            bundle_url: bundle_url.into(),
        }
    }

    /// Set the compatible threshold (builder).
    pub fn with_last_compatible(mut self, version: u64) -> Self {
        self.last_compatible_version = version;
        self
    }

    /// Set the mandatory threshold (builder).
    pub fn with_last_mandatory(mut self, version: u64) -> Self {
        self.last_mandatory_version = version;
        self
    }

    /// Whether the thresholds are ordered as expected.
    pub fn is_consistent(&self) -> bool {
        self.last_compatible_version <= self.last_mandatory_version
            && self.last_mandatory_version <= self.version
    }
}
