use std::{fmt, rc::Rc};

use floem_reactive::{ReadSignal, RwSignal, SignalGet, SignalUpdate};
use indexmap::IndexMap;

/// The live match state of every breakpoint.
///
/// Each breakpoint is backed by its own signal, so a view that reads
/// `mobile` only re-runs when `mobile` flips. Clones share the same
/// signals: a store handed out before a change observes that change.
#[derive(Clone)]
pub struct MatchMediaStore {
    entries: Rc<IndexMap<String, RwSignal<bool>>>,
}

impl MatchMediaStore {
    pub(crate) fn new(entries: IndexMap<String, RwSignal<bool>>) -> Self {
        Self {
            entries: Rc::new(entries),
        }
    }

    /// Whether `name` currently matches, subscribing the running effect.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries.get(name).map(|signal| signal.get())
    }

    /// Like [`get`](Self::get) without subscribing.
    pub fn get_untracked(&self, name: &str) -> Option<bool> {
        self.entries.get(name).map(|signal| signal.get_untracked())
    }

    /// The read half of a breakpoint's signal, for use in views.
    pub fn signal(&self, name: &str) -> Option<ReadSignal<bool>> {
        self.entries.get(name).map(|signal| signal.read_only())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current state of every breakpoint, without subscribing.
    pub fn snapshot(&self) -> IndexMap<String, bool> {
        self.entries
            .iter()
            .map(|(name, signal)| (name.clone(), signal.get_untracked()))
            .collect()
    }

    /// Whether both handles point at the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    pub(crate) fn set(&self, name: &str, matches: bool) {
        if let Some(signal) = self.entries.get(name) {
            signal.set(matches);
        }
    }
}

impl fmt::Debug for MatchMediaStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.snapshot()).finish()
    }
}
