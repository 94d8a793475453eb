//! Integration tests for kui-shell.
//!
//! These tests exercise the public API from outside the crate, verifying that
//! routing, the view stack, overlays, and the update gate work together.

use std::sync::Arc;

use kui_shell::app::{AppConfig, BackOutcome};
use kui_shell::nav::{EntryStatus, NavigationEvent, NavigationState, Navigator};
use kui_shell::overlay::{Drawer, Overlay};
use kui_shell::persist::{MemoryStore, CURRENT_BUNDLE_KEY};
use kui_shell::route::{RoutePattern, RouteTable};
use kui_shell::testing::{FakeDevice, FakeUpdater, FakeVersionCheck, Pilot};
use kui_shell::update::{
    AutoUpdatePreference, GateState, Screen, UpdateBundle, UpdateConfig, UpdateGate,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn pilot_at(path: &str) -> Pilot {
    let config = AppConfig::new()
        .with_main_routes(["/home", "/explore"])
        .with_initial_path(path);
    Pilot::new(config, &["/home", "/explore", "/deep/link", "/users/:id"]).unwrap()
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[test]
fn test_param_route_matches_exact_segment_count() {
    let pattern = RoutePattern::parse("/users/:id").unwrap();
    let params = pattern.matches("/users/42").unwrap();
    assert_eq!(params.get("id"), Some("42"));
    assert!(pattern.matches("/users/42/extra").is_none());
}

#[test]
fn test_first_registered_route_wins() {
    let mut pilot = Pilot::with_routes(
        AppConfig::new().with_main_routes(["/"]),
        RouteTable::new()
            .route("/users/me", |_| "me".to_string())
            .unwrap()
            .route("/users/:id", |p| format!("user {}", p.get("id").unwrap_or("?")))
            .unwrap(),
    )
    .unwrap();

    pilot.push("/users/me");
    pilot.push("/users/ada%20l");
    pilot.process().unwrap();
    assert_eq!(pilot.current_page(), Some("user ada l"));
    pilot.press_back();
    pilot.process().unwrap();
    assert_eq!(pilot.current_page(), Some("me"));
}

// ---------------------------------------------------------------------------
// View stack
// ---------------------------------------------------------------------------

#[test]
fn test_deep_link_gets_main_root() {
    let pilot = pilot_at("/deep/link");
    insta::assert_snapshot!(pilot.describe(), @r"
    /home [background]
    /deep/link [active]
    ");

    let mut pilot = pilot;
    pilot.pop();
    pilot.process().unwrap();
    assert_eq!(pilot.describe(), "/home [active]");
}

#[test]
fn test_main_route_starts_alone() {
    let pilot = pilot_at("/explore");
    assert_eq!(pilot.paths(), vec!["/explore"]);
}

#[test]
fn test_replace_keeps_depth() {
    let mut pilot = pilot_at("/home");
    pilot.push("/users/1");
    pilot.replace("/users/2");
    pilot.process().unwrap();
    assert_eq!(pilot.paths(), vec!["/home", "/users/2"]);
}

#[test]
fn test_push_state_is_kept_on_entry() {
    let mut pilot = pilot_at("/home");
    pilot.push_with_state("/users/3", serde_json::json!({ "from": "feed" }));
    pilot.process().unwrap();
    let top = pilot.app().navigator.current_entry().unwrap();
    assert_eq!(top.state["from"], "feed");
    assert_eq!(top.status, EntryStatus::Active);
}

#[derive(Debug, Clone)]
enum Op {
    Push(usize),
    Replace(usize),
    Pop,
}

const PATHS: [&str; 4] = ["/home", "/explore", "/users/1", "/missing"];

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..PATHS.len()).prop_map(Op::Push),
        (0..PATHS.len()).prop_map(Op::Replace),
        Just(Op::Pop),
    ]
}

proptest! {
    #[test]
    fn test_stack_never_empties(ops in prop::collection::vec(op(), 0..40)) {
        let mut nav = Navigator::new(|path: &str| Some(path.to_string()));
        nav.initialize("/home", &["/home"]).unwrap();

        for op in ops {
            let before = nav.len();
            let before_path = nav.current_path().map(str::to_owned);
            let event = match op {
                Op::Push(i) => NavigationEvent::push(PATHS[i]),
                Op::Replace(i) => NavigationEvent::replace(PATHS[i]),
                Op::Pop => NavigationEvent::Pop,
            };
            let is_pop = matches!(event, NavigationEvent::Pop);
            nav.apply_event(event).unwrap();

            prop_assert!(!nav.is_empty());
            if is_pop && before == 1 {
                prop_assert_eq!(nav.len(), 1);
                prop_assert_eq!(nav.current_path().map(str::to_owned), before_path);
            }
            let active = nav.entries().iter().filter(|e| e.status == EntryStatus::Active).count();
            prop_assert_eq!(active, 1);
            prop_assert!(nav.entries().last().is_some_and(|e| e.status == EntryStatus::Active));
        }
    }
}

// ---------------------------------------------------------------------------
// Back handling
// ---------------------------------------------------------------------------

#[test]
fn test_overlay_intercepts_back_until_closed() {
    let mut pilot = pilot_at("/users/9");
    let overlay = Overlay::new();

    pilot.open_overlay(&overlay);
    assert_eq!(
        pilot.back().unwrap(),
        BackOutcome::Intercepted(overlay.id().to_string())
    );
    assert!(!overlay.is_open());
    assert_eq!(pilot.current_path(), Some("/users/9"));

    pilot.open_overlay(&overlay);
    overlay.close(&mut pilot.app_mut().back_handlers);
    assert_eq!(pilot.back().unwrap(), BackOutcome::Popped);
    assert_eq!(pilot.current_path(), Some("/home"));
}

#[test]
fn test_drawer_is_popped_by_back() {
    let mut pilot = pilot_at("/home");
    let mut drawer = Drawer::new("menu".to_string());
    pilot.open_drawer(&mut drawer).unwrap();
    assert!(drawer.is_visible(&pilot.app().navigator));
    insta::assert_snapshot!(pilot.describe(), @r"
    /home [background]
    (detached) [active]
    ");

    assert_eq!(pilot.back().unwrap(), BackOutcome::Popped);
    assert!(!drawer.is_open(&pilot.app().navigator));
    assert_eq!(pilot.describe(), "/home [active]");
}

#[test]
fn test_drawer_close_under_newer_page() {
    let mut pilot = pilot_at("/home");
    let mut drawer = Drawer::new("menu".to_string());
    pilot.open_drawer(&mut drawer).unwrap();
    pilot.push("/users/5");
    pilot.process().unwrap();
    assert!(drawer.is_open(&pilot.app().navigator));
    assert!(!drawer.is_visible(&pilot.app().navigator));

    assert!(drawer.close(&mut pilot.app_mut().navigator));
    assert_eq!(pilot.paths(), vec!["/home", "/users/5"]);
    assert_eq!(pilot.app().navigator.len(), 2);
}

// ---------------------------------------------------------------------------
// Update gate
// ---------------------------------------------------------------------------

struct GateRig {
    gate: UpdateGate,
    updater: FakeUpdater,
    store: Arc<MemoryStore>,
}

fn gate(update: Option<UpdateBundle>, build: &str, store: MemoryStore) -> GateRig {
    let check = match update {
        Some(bundle) => FakeVersionCheck::returning(bundle),
        None => FakeVersionCheck::none(),
    };
    let updater = FakeUpdater::new();
    let store = Arc::new(store);
    let gate = UpdateGate::new(
        UpdateConfig::new().with_play_store_url("https://play.example/kui"),
        check,
        updater.clone(),
        FakeDevice::android(build),
        Arc::clone(&store),
    );
    GateRig {
        gate,
        updater,
        store,
    }
}

#[tokio::test]
async fn test_compatible_update_applies_once() {
    let bundle = UpdateBundle::new(6, "https://cdn.example/6")
        .with_last_compatible(5)
        .with_last_mandatory(5);
    let mut rig = gate(Some(bundle.clone()), "5", MemoryStore::new());

    assert_eq!(rig.gate.start().await, &GateState::UpToDate);
    assert_eq!(rig.updater.downloads().len(), 1);
    assert_eq!(rig.updater.applied().len(), 1);
    assert_eq!(rig.gate.current_bundle().await, Some(bundle));
    assert_eq!(rig.gate.screen(), Screen::Children);
}

#[tokio::test]
async fn test_mandatory_update_blocks_children() {
    let bundle = UpdateBundle::new(10, "u")
        .with_last_compatible(8)
        .with_last_mandatory(7);
    let mut rig = gate(Some(bundle), "3", MemoryStore::new());

    rig.gate.start().await;
    let Screen::Blocked(notice) = rig.gate.screen() else {
        panic!("expected the blocking screen");
    };
    assert_eq!(notice.store_url, "https://play.example/kui");
    assert_eq!(notice.diagnostic(), "cb3-bb3-ab10");
    assert!(rig.updater.downloads().is_empty());
}

#[tokio::test]
async fn test_disabled_preference_skips_download() {
    let mut rig = gate(
        Some(UpdateBundle::new(6, "u").with_last_compatible(5)),
        "5",
        MemoryStore::new().with_value("auto-update-preference", "DISABLE"),
    );
    assert_eq!(rig.gate.start().await, &GateState::UpToDate);
    assert_eq!(rig.gate.preference(), AutoUpdatePreference::Disable);
    assert!(rig.updater.downloads().is_empty());
    assert_eq!(rig.gate.screen(), Screen::Children);
}

#[tokio::test]
async fn test_newer_install_discards_applied_bundle() {
    let stale = serde_json::to_string(&UpdateBundle::new(4, "old")).unwrap();
    let mut rig = gate(None, "6", MemoryStore::new().with_value(CURRENT_BUNDLE_KEY, stale));

    rig.gate.start().await;
    assert_eq!(rig.store.peek(CURRENT_BUNDLE_KEY), None);
    assert_eq!(rig.gate.current_bundle().await, None);
}

#[tokio::test]
async fn test_discard_happens_before_the_decision() {
    let stale = serde_json::to_string(&UpdateBundle::new(4, "old")).unwrap();
    let mut rig = gate(
        Some(UpdateBundle::new(5, "u")),
        "6",
        MemoryStore::new().with_value(CURRENT_BUNDLE_KEY, stale.clone()),
    );
    assert_eq!(rig.gate.start().await, &GateState::UpToDate);
    assert!(rig.updater.downloads().is_empty());

    let mut rig = gate(
        Some(UpdateBundle::new(7, "next").with_last_compatible(6)),
        "6",
        MemoryStore::new().with_value(CURRENT_BUNDLE_KEY, stale),
    );
    assert_eq!(rig.gate.start().await, &GateState::UpToDate);
    assert_eq!(rig.updater.downloads(), vec![("next".to_string(), 7)]);
}

#[test]
fn test_gate_runs_on_a_plain_executor() {
    let mut rig = gate(None, "1", MemoryStore::new());
    let state = tokio_test::block_on(rig.gate.start()).clone();
    assert_eq!(state, GateState::UpToDate);
    assert_eq!(rig.updater.ready_calls(), 1);
}

#[test]
fn test_navigation_state_defaults_to_null() {
    let event = NavigationEvent::push("/home");
    assert!(matches!(
        event,
        NavigationEvent::Push { ref state, .. } if *state == NavigationState::Null
    ));
}
