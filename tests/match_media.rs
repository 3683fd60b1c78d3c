//! Tests for installing breakpoints against media environments.
//!
//! These tests verify that:
//! - Flags start from the environment and follow its change notifications
//! - Server-side installs use default values and require them
//! - Failed installs publish nothing and release what they acquired
//! - Platform installs outside a browser fall back to default values
//! - Dropping, disposing and detaching control the subscriptions

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use floem_match_media::{
    Breakpoint, Breakpoints, Condition, Error, MatchMedia, MediaEnvironment, MediaQueryWatcher,
    Viewport, use_match_media,
};

/// A media environment whose query results are set by the test.
#[derive(Clone, Default)]
struct MockMedia {
    state: Rc<RefCell<MockState>>,
}

#[derive(Default)]
struct MockState {
    matches: HashMap<String, bool>,
    callbacks: Vec<(usize, String, Rc<dyn Fn(bool)>)>,
    live: HashMap<usize, bool>,
    next: usize,
    fail_on: Option<String>,
    refuse_listeners_on: Option<String>,
}

impl MockMedia {
    fn with(matches: &[(&str, bool)]) -> Self {
        let media = MockMedia::default();
        for (condition, value) in matches {
            media
                .state
                .borrow_mut()
                .matches
                .insert(condition.to_string(), *value);
        }
        media
    }

    /// Change a query result and notify its listeners, like a browser would.
    fn set(&self, condition: &str, matches: bool) {
        let callbacks: Vec<_> = {
            let mut state = self.state.borrow_mut();
            state.matches.insert(condition.to_string(), matches);
            state
                .callbacks
                .iter()
                .filter(|(_, c, _)| c == condition)
                .map(|(_, _, cb)| cb.clone())
                .collect()
        };
        for callback in callbacks {
            callback(matches);
        }
    }

    fn live_watchers(&self) -> usize {
        self.state.borrow().live.values().filter(|live| **live).count()
    }
}

impl MediaEnvironment for MockMedia {
    fn watch(&self, condition: &Condition) -> Result<Box<dyn MediaQueryWatcher>, Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_on.as_deref() == Some(condition.as_str()) {
            return Err(Error::MatchMedia {
                condition: condition.to_string(),
                message: "unsupported".to_string(),
            });
        }
        let id = state.next;
        state.next += 1;
        state.live.insert(id, true);
        Ok(Box::new(MockWatcher {
            id,
            condition: condition.to_string(),
            media: self.clone(),
        }))
    }
}

struct MockWatcher {
    id: usize,
    condition: String,
    media: MockMedia,
}

impl MediaQueryWatcher for MockWatcher {
    fn currently_matches(&self) -> bool {
        self.media
            .state
            .borrow()
            .matches
            .get(&self.condition)
            .copied()
            .unwrap_or(false)
    }

    fn on_change(&mut self, callback: Box<dyn Fn(bool)>) -> Result<(), Error> {
        let mut state = self.media.state.borrow_mut();
        if state.refuse_listeners_on.as_deref() == Some(self.condition.as_str()) {
            return Err(Error::MatchMedia {
                condition: self.condition.clone(),
                message: "listener refused".to_string(),
            });
        }
        state
            .callbacks
            .push((self.id, self.condition.clone(), Rc::from(callback)));
        Ok(())
    }

    fn release(&mut self) {
        let mut state = self.media.state.borrow_mut();
        state.live.insert(self.id, false);
        state.callbacks.retain(|(id, _, _)| *id != self.id);
    }
}

fn breakpoints() -> Breakpoints {
    Breakpoints::new()
        .breakpoint("mobile", [320, 767])
        .breakpoint("desktop", 1024)
        .breakpoint(
            "landscape",
            Breakpoint::features([("orientation", "landscape")]),
        )
}

const MOBILE: &str = "(min-width: 320px) and (max-width: 767px)";
const DESKTOP: &str = "(min-width: 1024px)";
const LANDSCAPE: &str = "(orientation: landscape)";

#[test]
fn flags_follow_the_environment() {
    let media = MockMedia::with(&[(DESKTOP, true)]);
    let installed = MatchMedia::install(&breakpoints(), Some(&media)).unwrap();
    let store = installed.store().clone();

    assert!(installed.is_live());
    assert_eq!(store.get("desktop"), Some(true));
    assert_eq!(store.get("mobile"), Some(false));

    media.set(DESKTOP, false);
    assert_eq!(store.get("desktop"), Some(false));

    media.set(MOBILE, true);
    assert_eq!(store.get("mobile"), Some(true));
    // Other breakpoints are untouched.
    assert_eq!(store.get("landscape"), Some(false));
}

#[test]
fn conditions_are_compiled_per_breakpoint() {
    let media = MockMedia::default();
    let installed = MatchMedia::install(&breakpoints(), Some(&media)).unwrap();
    let conditions: Vec<(&str, &str)> = installed
        .conditions()
        .iter()
        .map(|(name, condition)| (name, condition.as_str()))
        .collect();
    assert_eq!(
        conditions,
        [("mobile", MOBILE), ("desktop", DESKTOP), ("landscape", LANDSCAPE)]
    );
}

#[test]
fn store_keys_match_declarations() {
    let media = MockMedia::default();
    let installed = MatchMedia::install(&breakpoints(), Some(&media)).unwrap();
    let store = installed.store();
    assert_eq!(store.len(), 3);
    assert_eq!(
        store.names().collect::<Vec<_>>(),
        ["mobile", "desktop", "landscape"]
    );
    assert_eq!(media.live_watchers(), 3);
}

#[test]
fn server_side_uses_defaults() {
    let breakpoints = Breakpoints::new()
        .breakpoint("desktop", Breakpoint::from(500).with_default(true))
        .breakpoint("mobile", Breakpoint::max(499).with_default(false));
    let installed = MatchMedia::install(&breakpoints, None).unwrap();

    assert!(!installed.is_live());
    assert_eq!(installed.store().get("desktop"), Some(true));
    assert_eq!(installed.store().get("mobile"), Some(false));
}

#[test]
fn server_side_requires_defaults() {
    let breakpoints = Breakpoints::new()
        .breakpoint("desktop", Breakpoint::from(500).with_default(true))
        .breakpoint("mobile", Breakpoint::max(499));
    match MatchMedia::install(&breakpoints, None) {
        Err(Error::MissingDefaultValue { breakpoint }) => assert_eq!(breakpoint, "mobile"),
        other => panic!("expected a missing default value, got {other:?}"),
    }
}

#[test]
fn defaults_are_ignored_with_an_environment() {
    let breakpoints = Breakpoints::new().breakpoint("desktop", Breakpoint::from(1024).with_default(true));
    let media = MockMedia::default();
    let installed = MatchMedia::install(&breakpoints, Some(&media)).unwrap();
    assert_eq!(installed.store().get("desktop"), Some(false));
}

#[test]
fn invalid_units_abort_before_watching() {
    let breakpoints = breakpoints().breakpoint("broken", Breakpoint::features([("minWidth", f64::NAN)]));
    let media = MockMedia::default();
    let result = MatchMedia::install(&breakpoints, Some(&media));
    assert!(matches!(
        result,
        Err(Error::InvalidUnit { ref breakpoint, .. }) if breakpoint == "broken"
    ));
    assert_eq!(media.live_watchers(), 0);
}

#[test]
fn environment_failures_release_acquired_watchers() {
    let media = MockMedia::default();
    media.state.borrow_mut().fail_on = Some(LANDSCAPE.to_string());
    let result = MatchMedia::install(&breakpoints(), Some(&media));
    assert!(matches!(result, Err(Error::MatchMedia { .. })));
    assert_eq!(media.state.borrow().next, 2);
    assert_eq!(media.live_watchers(), 0);
}

#[test]
fn refused_listeners_abort_the_install() {
    let media = MockMedia::default();
    media.state.borrow_mut().refuse_listeners_on = Some(DESKTOP.to_string());
    let result = MatchMedia::install(&breakpoints(), Some(&media));
    assert!(matches!(
        result,
        Err(Error::MatchMedia { ref condition, .. }) if condition == DESKTOP
    ));
    // Every watcher was created, and all of them were released again.
    assert_eq!(media.state.borrow().next, 3);
    assert_eq!(media.live_watchers(), 0);

    media.set(MOBILE, true);
    assert!(media.state.borrow().callbacks.is_empty());
}

#[test]
fn platform_install_requires_defaults_outside_a_browser() {
    match MatchMedia::install_platform(&breakpoints()) {
        Err(Error::MissingDefaultValue { breakpoint }) => assert_eq!(breakpoint, "mobile"),
        other => panic!("expected a missing default value, got {other:?}"),
    }
}

#[test]
fn platform_install_uses_defaults_outside_a_browser() {
    let breakpoints = Breakpoints::new()
        .breakpoint("mobile", Breakpoint::max(767).with_default(false))
        .breakpoint("desktop", Breakpoint::from(1024).with_default(true));
    let installed = MatchMedia::install_platform(&breakpoints).unwrap();

    assert!(!installed.is_live());
    assert_eq!(installed.store().get("mobile"), Some(false));
    assert_eq!(installed.store().get("desktop"), Some(true));
}

#[test]
fn dropping_stops_updates() {
    let media = MockMedia::default();
    let installed = MatchMedia::install(&breakpoints(), Some(&media)).unwrap();
    let store = installed.store().clone();
    drop(installed);

    assert_eq!(media.live_watchers(), 0);
    media.set(DESKTOP, true);
    assert_eq!(store.get_untracked("desktop"), Some(false));
}

#[test]
fn detaching_keeps_updates() {
    let media = MockMedia::default();
    let store = MatchMedia::install(&breakpoints(), Some(&media))
        .unwrap()
        .detach();

    assert_eq!(media.live_watchers(), 3);
    media.set(DESKTOP, true);
    assert_eq!(store.get("desktop"), Some(true));
}

#[test]
fn disposing_releases_watchers() {
    let media = MockMedia::default();
    let installed = MatchMedia::install(&breakpoints(), Some(&media)).unwrap();
    installed.dispose();
    assert_eq!(media.live_watchers(), 0);
}

#[test]
fn provided_store_is_shared() {
    let media = MockMedia::default();
    let installed = MatchMedia::install(&breakpoints(), Some(&media)).unwrap();
    installed.provide();

    let from_context = use_match_media().unwrap();
    assert!(from_context.ptr_eq(installed.store()));

    media.set(LANDSCAPE, true);
    assert_eq!(from_context.get("landscape"), Some(true));
}

#[test]
fn viewport_environment() {
    let viewport = Viewport::new((375.0, 667.0));
    let installed = MatchMedia::install(&breakpoints(), Some(&viewport)).unwrap();
    let store = installed.store().clone();
    assert_eq!(
        store.snapshot().into_iter().collect::<Vec<_>>(),
        [
            ("mobile".to_string(), true),
            ("desktop".to_string(), false),
            ("landscape".to_string(), false),
        ]
    );

    viewport.resize((1366.0, 768.0));
    assert_eq!(store.get("mobile"), Some(false));
    assert_eq!(store.get("desktop"), Some(true));
    assert_eq!(store.get("landscape"), Some(true));

    assert_eq!(viewport.watcher_count(), 3);
    drop(installed);
    assert_eq!(viewport.watcher_count(), 0);
}

#[test]
fn json_configuration() {
    let breakpoints = Breakpoints::from_json(
        r#"{
            "breakpoints": {
                "mobile": { "breakpoint": [null, 767], "defaultValue": true },
                "desktop": { "breakpoint": 1024, "defaultValue": false }
            }
        }"#,
    )
    .unwrap();
    let installed = MatchMedia::install(&breakpoints, None).unwrap();
    assert_eq!(installed.store().get("mobile"), Some(true));
    assert_eq!(installed.store().get("desktop"), Some(false));
    assert_eq!(
        installed.conditions().get("mobile").unwrap().as_str(),
        "(max-width: 767px)"
    );
}
