use floem_reactive::{Scope, provide_context, use_context};
use indexmap::IndexMap;

use crate::{
    breakpoint::Breakpoints,
    condition::BreakpointRegistry,
    error::Error,
    store::MatchMediaStore,
    watcher::{MediaEnvironment, Subscriptions},
};

/// Installed breakpoints: the reactive [`MatchMediaStore`] plus the media
/// query subscriptions feeding it.
///
/// Subscriptions last as long as this value. Dropping it stops updates
/// while the store keeps its last state; [`detach`](Self::detach) keeps
/// them running for the rest of the process instead.
///
/// ```rust
/// use floem_match_media::{Breakpoints, MatchMedia, Viewport};
///
/// let viewport = Viewport::new((800.0, 600.0));
/// let breakpoints = Breakpoints::new()
///     .breakpoint("mobile", [0, 767])
///     .breakpoint("desktop", 1024);
///
/// let media = MatchMedia::install(&breakpoints, Some(&viewport)).unwrap();
/// let store = media.store().clone();
/// assert_eq!(store.get("mobile"), Some(false));
///
/// viewport.resize((1280.0, 800.0));
/// assert_eq!(store.get("desktop"), Some(true));
/// ```
pub struct MatchMedia {
    store: MatchMediaStore,
    registry: BreakpointRegistry,
    subscriptions: Subscriptions,
    scope: Scope,
    live: bool,
}

impl MatchMedia {
    /// Compile `breakpoints` and bind each one to a reactive flag.
    ///
    /// With an `environment`, every flag starts from the live query and
    /// follows its changes. Without one (server-side rendering) every
    /// breakpoint must declare a default value, which becomes its fixed
    /// state. Any error aborts the whole installation.
    pub fn install(
        breakpoints: &Breakpoints,
        environment: Option<&dyn MediaEnvironment>,
    ) -> Result<Self, Error> {
        let registry = BreakpointRegistry::compile(breakpoints)?;
        let mut subscriptions = Subscriptions::default();
        let mut initial = IndexMap::with_capacity(registry.len());

        match environment {
            None => {
                for (name, entry) in breakpoints.iter() {
                    let default_value =
                        entry
                            .default_value
                            .ok_or_else(|| Error::MissingDefaultValue {
                                breakpoint: name.to_string(),
                            })?;
                    initial.insert(name.to_string(), default_value);
                }
            }
            Some(environment) => {
                for (name, condition) in registry.iter() {
                    let watcher = environment.watch(condition)?;
                    initial.insert(name.to_string(), watcher.currently_matches());
                    subscriptions.push(watcher);
                }
            }
        }

        let scope = Scope::current().create_child();
        let store = MatchMediaStore::new(
            initial
                .into_iter()
                .map(|(name, matches)| (name, scope.create_rw_signal(matches)))
                .collect(),
        );

        for (name, watcher) in store.names().zip(subscriptions.iter_mut()) {
            let store = store.clone();
            let name = name.to_string();
            let listening = watcher.on_change(Box::new(move |matches| {
                tracing::trace!(breakpoint = %name, matches, "media query changed");
                store.set(&name, matches);
            }));
            // Returning drops `subscriptions`, which releases every watcher.
            if let Err(err) = listening {
                scope.dispose();
                return Err(err);
            }
        }

        tracing::debug!(
            breakpoints = store.len(),
            live = environment.is_some(),
            "installed media query breakpoints"
        );

        Ok(Self {
            store,
            registry,
            subscriptions,
            scope,
            live: environment.is_some(),
        })
    }

    /// Install against the platform's own media queries: the browser window
    /// on wasm32, falling back to default values where there is none.
    pub fn install_platform(breakpoints: &Breakpoints) -> Result<Self, Error> {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(web) = crate::web::WebMedia::detect() {
                return Self::install(breakpoints, Some(&web));
            }
        }
        Self::install(breakpoints, None)
    }

    pub fn store(&self) -> &MatchMediaStore {
        &self.store
    }

    /// The compiled condition of every breakpoint.
    pub fn conditions(&self) -> &BreakpointRegistry {
        &self.registry
    }

    /// Whether the flags follow a live media environment.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Make the store available to [`use_match_media`] anywhere in the
    /// reactive runtime.
    pub fn provide(&self) {
        provide_context(self.store.clone());
    }

    /// Keep the subscriptions alive for the rest of the process and hand
    /// back the store.
    pub fn detach(self) -> MatchMediaStore {
        self.subscriptions.leak();
        self.store
    }

    /// Release every subscription and dispose the signals. Reading the store
    /// afterwards is an error of the reactive runtime.
    pub fn dispose(self) {
        let MatchMedia {
            mut subscriptions,
            scope,
            ..
        } = self;
        subscriptions.release();
        scope.dispose();
    }
}

impl std::fmt::Debug for MatchMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchMedia")
            .field("store", &self.store)
            .field("conditions", &self.registry)
            .field("subscriptions", &self.subscriptions)
            .finish()
    }
}

/// The store published by [`MatchMedia::provide`], if any.
pub fn use_match_media() -> Option<MatchMediaStore> {
    use_context::<MatchMediaStore>()
}
