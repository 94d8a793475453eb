//! The update decision table.
//!
//! Pure functions, no I/O: the gate gathers inputs from its collaborators
//! and asks these what to do.

use super::bundle::{AutoUpdatePreference, CurrentBundle, UpdateBundle};

/// Outcome of comparing a version-check result against the running version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The check reported nothing.
    NoUpdate,
    /// The reported bundle is not newer than what is running.
    Stale,
    /// Download and apply silently.
    AutoUpdate,
    /// Block the app until the binary is updated.
    Mandatory,
    /// Newer bundle exists but may not be applied silently and is not required.
    Optional,
}

impl Decision {
    /// Whether the host's normal UI should be shown.
    pub fn renders_children(&self) -> bool {
        *self != Self::Mandatory
    }
}

/// Installed build number from the device-reported build string: the leading
/// run of digits, so `"12.1"` is build 12. No leading digits counts as build 0.
pub fn installed_build_number(build: &str) -> u64 {
    let build = build.trim_start();
    let end = build
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(build.len());
    build[..end].parse().unwrap_or(0)
}

/// Whether the persisted bundle predates the installed binary and must be
/// discarded: a store upgrade past the last hot patch invalidates it.
pub fn should_discard(current: Option<&CurrentBundle>, installed_build: u64) -> bool {
    current.is_some_and(|bundle| installed_build > bundle.version)
}

/// The running version: the applied bundle's, else the installed build's.
pub fn current_version(current: Option<&CurrentBundle>, installed_build: u64) -> u64 {
    current.map_or(installed_build, |bundle| bundle.version)
}

/// Decide what to do with a version-check result.
pub fn decide(
    update: Option<&UpdateBundle>,
    current_version: u64,
    preference: AutoUpdatePreference,
) -> Decision {
    let Some(update) = update else {
        return Decision::NoUpdate;
    };
    if update.version <= current_version {
        return Decision::Stale;
    }
    if preference.allows_auto_update()
        && update.last_compatible_version <= current_version
        && update.last_mandatory_version <= current_version
    {
        return Decision::AutoUpdate;
    }
    if update.last_mandatory_version > current_version {
        return Decision::Mandatory;
    }
    Decision::Optional
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use AutoUpdatePreference::*;

    fn bundle(version: u64, compatible: u64, mandatory: u64) -> UpdateBundle {
        UpdateBundle::new(version, format!("https://cdn/{version}.zip"))
            .with_last_compatible(compatible)
            .with_last_mandatory(mandatory)
    }

    // ── decide ───────────────────────────────────────────────────────

    #[test]
    fn no_update() {
        assert_eq!(decide(None, 5, Production), Decision::NoUpdate);
    }

    #[test]
    fn stale_update_is_ignored() {
        assert_eq!(decide(Some(&bundle(5, 0, 0)), 5, Production), Decision::Stale);
        assert_eq!(decide(Some(&bundle(4, 0, 0)), 5, Production), Decision::Stale);
    }

    #[test]
    fn compatible_update_applies_silently() {
        assert_eq!(decide(Some(&bundle(6, 5, 5)), 5, Production), Decision::AutoUpdate);
        assert_eq!(decide(Some(&bundle(6, 5, 5)), 5, Beta), Decision::AutoUpdate);
        assert_eq!(decide(Some(&bundle(6, 5, 5)), 5, Development), Decision::AutoUpdate);
    }

    #[test]
    fn mandatory_threshold_blocks() {
        assert_eq!(decide(Some(&bundle(10, 8, 7)), 3, Production), Decision::Mandatory);
    }

    #[test]
    fn mandatory_blocks_even_when_disabled() {
        assert_eq!(decide(Some(&bundle(10, 8, 7)), 3, Disable), Decision::Mandatory);
    }

    #[test]
    fn disabled_preference_leaves_optional() {
        assert_eq!(decide(Some(&bundle(6, 5, 5)), 5, Disable), Decision::Optional);
    }

    #[test]
    fn incompatible_but_not_mandatory_is_optional() {
        // Thresholds out of order: compatible above running, mandatory below.
        assert_eq!(decide(Some(&bundle(9, 8, 2)), 5, Production), Decision::Optional);
    }

    #[test]
    fn renders_children() {
        assert!(Decision::AutoUpdate.renders_children());
        assert!(Decision::Optional.renders_children());
        assert!(!Decision::Mandatory.renders_children());
    }

    // ── versions ─────────────────────────────────────────────────────

    #[test]
    fn build_number_parsing() {
        assert_eq!(installed_build_number("42"), 42);
        assert_eq!(installed_build_number(" 7 "), 7);
        assert_eq!(installed_build_number(""), 0);
        assert_eq!(installed_build_number("1.2.3"), 1);
        assert_eq!(installed_build_number("12.1"), 12);
        assert_eq!(installed_build_number("12 (3)"), 12);
        assert_eq!(installed_build_number("beta-4"), 0);
    }

    #[test]
    fn current_version_prefers_bundle() {
        let applied = bundle(9, 0, 0);
        assert_eq!(current_version(Some(&applied), 4), 9);
        assert_eq!(current_version(None, 4), 4);
    }

    #[test]
    fn discard_when_binary_overtakes_bundle() {
        let applied = bundle(4, 0, 0);
        assert!(should_discard(Some(&applied), 6));
        assert!(!should_discard(Some(&applied), 4));
        assert!(!should_discard(Some(&applied), 3));
        assert!(!should_discard(None, 6));
    }
}
